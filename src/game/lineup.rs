//! Batting order and fielding assignments for one side.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

use super::{BattingSlot, FieldingPosition};
use crate::error::GameError;
use crate::roster::{PlayerId, RosterResolver, Team};

/// A requested lineup slot as submitted by a caller.
///
/// Numbers are raw here; [`Lineup::build`] turns them into checked types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct LineupEntry {
    /// Place in the batting order.
    pub number_in_batting_order: u8,
    /// Scorebook fielding position.
    pub fielding_position: u8,
    /// Player filling the slot.
    pub player_id: PlayerId,
}

/// Request body for replacing a side's lineup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupDefinition {
    /// Requested slots, in any order.
    pub participants: Vec<LineupEntry>,
}

/// A player bound to a batting slot and fielding position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    batting_order: BattingSlot,
    fielding_position: FieldingPosition,
    player: PlayerId,
}

/// A validated lineup, ordered by batting slot.
///
/// Slots, fielding positions and players are each unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lineup {
    participants: Vec<Participant>,
}

impl Lineup {
    /// Validates submitted entries against the team assigned to the side.
    ///
    /// Every player must resolve and belong to `team`. Batting slots,
    /// fielding positions and players may each appear only once.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] on the first violation found, or
    /// [`GameError::Store`] if the roster lookup itself fails.
    #[instrument(skip(entries, team, roster), fields(team = %team.id(), entries = entries.len()))]
    pub fn build<R>(entries: &[LineupEntry], team: &Team, roster: &R) -> Result<Self, GameError>
    where
        R: RosterResolver + ?Sized,
    {
        let mut slots = BTreeSet::new();
        let mut positions = BTreeSet::new();
        let mut players = BTreeSet::new();
        let mut participants = Vec::with_capacity(entries.len());

        for entry in entries {
            let slot = BattingSlot::try_from(entry.number_in_batting_order)?;
            let position = FieldingPosition::try_from(entry.fielding_position)?;

            if !slots.insert(slot) {
                warn!(slot = %slot, "Duplicate batting slot");
                return Err(GameError::validation(format!(
                    "Batting order position {} is assigned twice",
                    slot
                )));
            }
            if !positions.insert(position) {
                warn!(position = position.abbreviation(), "Duplicate fielding position");
                return Err(GameError::validation(format!(
                    "Fielding position {} is assigned twice",
                    position.abbreviation()
                )));
            }
            if !players.insert(entry.player_id) {
                warn!(player_id = %entry.player_id, "Player listed twice");
                return Err(GameError::validation(format!(
                    "Player {} appears twice in the lineup",
                    entry.player_id
                )));
            }

            if roster.player(entry.player_id)?.is_none() {
                warn!(player_id = %entry.player_id, "Unknown player in lineup");
                return Err(GameError::validation(format!(
                    "Unknown player {}",
                    entry.player_id
                )));
            }
            if !team.has_player(entry.player_id) {
                warn!(player_id = %entry.player_id, "Player not on team roster");
                return Err(GameError::validation(format!(
                    "Player {} is not on the {} roster",
                    entry.player_id,
                    team.display_name()
                )));
            }

            participants.push(Participant::new(slot, position, entry.player_id));
        }

        participants.sort_by_key(|p| p.batting_order);
        debug!(count = participants.len(), "Lineup validated");
        Ok(Self { participants })
    }

    /// Returns participants in batting order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Checks whether no one has been assigned.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Finds who bats in the given slot.
    pub fn batter(&self, slot: BattingSlot) -> Option<&Participant> {
        self.participants.iter().find(|p| p.batting_order == slot)
    }

    /// Finds who plays the given position.
    pub fn fielder(&self, position: FieldingPosition) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.fielding_position == position)
    }
}
