//! Identifiers and closed vocabularies for a recorded game.
//!
//! Everything that arrives as free text (sides, roles, positions) is parsed
//! into one of these types at the boundary, so the rest of the crate never
//! sees an unrecognized value.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoStaticStr};
use tracing::{instrument, warn};

use crate::error::GameError;

/// Unique identifier for a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct GameId(i32);

impl GameId {
    /// Returns the raw integer id.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// One half of a game's lineup.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Side {
    /// The visiting team, batting in the top half.
    Visiting,
    /// The home team, batting in the bottom half.
    Home,
}

impl Side {
    /// Parses a side name such as `"home"` or `"VISITING"`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for anything else.
    #[instrument]
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        Self::from_str(raw.trim()).map_err(|_| {
            warn!(side = raw, "Unrecognized side");
            GameError::validation(format!("Unknown side '{}'", raw))
        })
    }

    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::Visiting => Self::Home,
            Self::Home => Self::Visiting,
        }
    }
}

/// Top or bottom of an inning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HalfInning {
    /// Visitors bat.
    Top,
    /// Home team bats.
    Bottom,
}

impl HalfInning {
    /// Returns the side at bat during this half.
    pub fn batting_side(self) -> Side {
        match self {
            Self::Top => Side::Visiting,
            Self::Bottom => Side::Home,
        }
    }
}

/// A strategic decision-making slot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Role {
    /// Field manager.
    Manager,
    /// Pitching coach.
    PitchingCoach,
    /// Hitting coach.
    HittingCoach,
    /// Bench coach.
    BenchCoach,
}

impl Role {
    /// Parses a role name such as `"manager"` or `"pitching-coach"`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownRole`] if the name is not recognized.
    #[instrument]
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        Self::from_str(raw.trim()).map_err(|_| {
            warn!(role = raw, "Unrecognized strategy role");
            GameError::UnknownRole(raw.to_string())
        })
    }
}

/// A fielding position in scorebook numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum FieldingPosition {
    /// 1
    Pitcher = 1,
    /// 2
    Catcher = 2,
    /// 3
    FirstBase = 3,
    /// 4
    SecondBase = 4,
    /// 5
    ThirdBase = 5,
    /// 6
    Shortstop = 6,
    /// 7
    LeftField = 7,
    /// 8
    CenterField = 8,
    /// 9
    RightField = 9,
    /// Bats but does not field.
    DesignatedHitter = 10,
}

impl FieldingPosition {
    /// Scorebook abbreviation, e.g. "SS".
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Pitcher => "P",
            Self::Catcher => "C",
            Self::FirstBase => "1B",
            Self::SecondBase => "2B",
            Self::ThirdBase => "3B",
            Self::Shortstop => "SS",
            Self::LeftField => "LF",
            Self::CenterField => "CF",
            Self::RightField => "RF",
            Self::DesignatedHitter => "DH",
        }
    }
}

impl TryFrom<u8> for FieldingPosition {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Pitcher,
            2 => Self::Catcher,
            3 => Self::FirstBase,
            4 => Self::SecondBase,
            5 => Self::ThirdBase,
            6 => Self::Shortstop,
            7 => Self::LeftField,
            8 => Self::CenterField,
            9 => Self::RightField,
            10 => Self::DesignatedHitter,
            other => {
                return Err(GameError::validation(format!(
                    "Fielding position {} is outside 1-10",
                    other
                )));
            }
        })
    }
}

impl From<FieldingPosition> for u8 {
    fn from(position: FieldingPosition) -> Self {
        position as u8
    }
}

/// A place in the batting order, 1 through 9.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct BattingSlot(u8);

impl BattingSlot {
    /// Number of slots in a batting order.
    pub const COUNT: u8 = 9;

    /// Returns the slot number.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BattingSlot {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=Self::COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GameError::validation(format!(
                "Batting order position {} is outside 1-{}",
                value,
                Self::COUNT
            )))
        }
    }
}

impl From<BattingSlot> for u8 {
    fn from(slot: BattingSlot) -> Self {
        slot.0
    }
}
