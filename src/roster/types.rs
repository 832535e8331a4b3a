//! Team and player identity types.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

/// Unique identifier for a team.
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
pub struct TeamId(i32);

impl TeamId {
    /// Returns the raw integer id.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Unique identifier for a player.
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
pub struct PlayerId(i32);

impl PlayerId {
    /// Returns the raw integer id.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Which side a player bats or throws from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
pub enum Handedness {
    /// Left-handed.
    #[serde(rename = "L")]
    #[strum(serialize = "L")]
    Left,
    /// Right-handed.
    #[serde(rename = "R")]
    #[strum(serialize = "R")]
    Right,
    /// Switch hitter (batting only).
    #[serde(rename = "S")]
    #[strum(serialize = "S")]
    Switch,
}

impl Handedness {
    /// Returns the single-letter scorebook code.
    pub fn code(self) -> &'static str {
        self.into()
    }
}

/// Descriptive data for a team, without its id or players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct TeamProfile {
    /// Home city.
    city: String,
    /// Club name.
    name: String,
    /// Owner's first name.
    owner_first_name: String,
    /// Owner's last name.
    owner_last_name: String,
}

/// A team resolved from the roster directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Team {
    id: TeamId,
    #[serde(flatten)]
    profile: TeamProfile,
    /// Players on the roster, in signing order.
    players: Vec<PlayerId>,
}

impl Team {
    /// Checks whether the player is on this team's roster.
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Returns "City Name", e.g. "Colorado Rockies".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.profile.city, self.profile.name)
    }
}

/// Biographical and performance attributes of a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PlayerProfile {
    first_name: String,
    last_name: String,
    /// Season the attributes describe.
    season: u16,
    /// Primary fielding position in scorebook numbering.
    primary_position: u8,
    bats: Handedness,
    throws: Handedness,
    /// Batting average in thousandths (.308 is 308).
    batting_average: u16,
    #[serde(default)]
    weight: Option<u16>,
}

/// A player resolved from the roster directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Player {
    id: PlayerId,
    team: TeamId,
    #[serde(flatten)]
    profile: PlayerProfile,
}

impl Player {
    /// Returns "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn handedness_parses_scorebook_letters() {
        assert_eq!(Handedness::from_str("L").unwrap(), Handedness::Left);
        assert_eq!(Handedness::from_str("S").unwrap(), Handedness::Switch);
        assert!(Handedness::from_str("X").is_err());
        assert_eq!(Handedness::Right.code(), "R");
    }

    #[test]
    fn team_membership() {
        let team = Team::new(
            TeamId::from(1),
            TeamProfile::new(
                "Colorado".to_string(),
                "Rockies".to_string(),
                "Ned".to_string(),
                "Gladstone".to_string(),
            ),
            vec![PlayerId::from(10), PlayerId::from(11)],
        );
        assert!(team.has_player(PlayerId::from(11)));
        assert!(!team.has_player(PlayerId::from(12)));
        assert_eq!(team.display_name(), "Colorado Rockies");
    }
}
