//! The play log: an append-only arena of actions and their result chains.
//!
//! Each submitted play arrives as a tree ([`ActionSubmission`]) whose
//! `results` are the events it set off, e.g. a called third strike followed
//! by a passed ball. The tree is validated as a whole, then flattened into
//! the [`ActionLog`] arena where every node refers to its children by
//! [`ActionId`]. Nodes are never edited or removed once stored.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumString, IntoStaticStr};
use tracing::{debug, instrument, warn};

use super::HalfInning;
use crate::error::GameError;
use crate::roster::PlayerId;

/// Deepest result chain accepted under a single play.
pub const MAX_RESULT_DEPTH: usize = 16;

/// Scorekeeping code describing what an action was.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(try_from = "String", into = "&'static str")]
#[strum(ascii_case_insensitive)]
pub enum OutcomeCode {
    /// Ball.
    #[strum(serialize = "B")]
    Ball,
    /// Strike, swinging or called, not ending the appearance.
    #[strum(serialize = "S")]
    Strike,
    /// Foul ball.
    #[strum(serialize = "F")]
    Foul,
    /// Strikeout swinging.
    #[strum(serialize = "K")]
    StrikeoutSwinging,
    /// Strikeout looking.
    #[strum(serialize = "KL")]
    StrikeoutLooking,
    /// Walk.
    #[strum(serialize = "BB")]
    Walk,
    /// Intentional walk.
    #[strum(serialize = "IBB")]
    IntentionalWalk,
    /// Hit by pitch.
    #[strum(serialize = "HBP")]
    HitByPitch,
    /// Single.
    #[strum(serialize = "1B")]
    Single,
    /// Double.
    #[strum(serialize = "2B")]
    Double,
    /// Triple.
    #[strum(serialize = "3B")]
    Triple,
    /// Home run.
    #[strum(serialize = "HR")]
    HomeRun,
    /// Ground out.
    #[strum(serialize = "GO")]
    GroundOut,
    /// Fly out.
    #[strum(serialize = "FO")]
    FlyOut,
    /// Line out.
    #[strum(serialize = "LO")]
    LineOut,
    /// Pop out.
    #[strum(serialize = "PO")]
    PopOut,
    /// Sacrifice fly.
    #[strum(serialize = "SF")]
    SacrificeFly,
    /// Sacrifice bunt.
    #[strum(serialize = "SAC")]
    SacrificeBunt,
    /// Fielder's choice.
    #[strum(serialize = "FC")]
    FieldersChoice,
    /// Double play.
    #[strum(serialize = "DP")]
    DoublePlay,
    /// Triple play.
    #[strum(serialize = "TP")]
    TriplePlay,
    /// Stolen base.
    #[strum(serialize = "SB")]
    StolenBase,
    /// Caught stealing.
    #[strum(serialize = "CS")]
    CaughtStealing,
    /// Pickoff.
    #[strum(serialize = "PK")]
    Pickoff,
    /// Wild pitch.
    #[strum(serialize = "WP")]
    WildPitch,
    /// Passed ball.
    #[strum(serialize = "PB")]
    PassedBall,
    /// Balk.
    #[strum(serialize = "BK")]
    Balk,
    /// Reached on error.
    #[strum(serialize = "E")]
    ReachedOnError,
}

impl OutcomeCode {
    /// Returns the scorebook code, e.g. "KL".
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Outs this outcome records when the scorer gives no override.
    pub fn default_outs(self) -> u8 {
        match self {
            Self::StrikeoutSwinging
            | Self::StrikeoutLooking
            | Self::GroundOut
            | Self::FlyOut
            | Self::LineOut
            | Self::PopOut
            | Self::SacrificeFly
            | Self::SacrificeBunt
            | Self::FieldersChoice
            | Self::CaughtStealing
            | Self::Pickoff => 1,
            Self::DoublePlay => 2,
            Self::TriplePlay => 3,
            _ => 0,
        }
    }

}

impl TryFrom<String> for OutcomeCode {
    type Error = GameError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::from_str(raw.trim())
            .map_err(|_| GameError::validation(format!("Unknown outcome code '{}'", raw)))
    }
}

/// Index of an action within its game's log.
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
#[serde(transparent)]
pub struct ActionId(usize);

impl ActionId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The recorded fields of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    inning: u8,
    half_inning: HalfInning,
    outs_at_start: u8,
    batting_team_score_before: u16,
    fielding_team_score_before: Option<u16>,
    player: PlayerId,
    timestamp: DateTime<Utc>,
    ball_count: u8,
    strike_count: u8,
    outcome: OutcomeCode,
    note: String,
    pitch_sequence_number: u16,
    scoring_play: bool,
    terminal_for_appearance: bool,
    runs_scored: Option<u8>,
    outs_recorded: Option<u8>,
}

impl ActionRecord {
    /// Runs credited to the batting side by this action.
    ///
    /// An explicit count wins; otherwise a home run or any play flagged as
    /// scoring counts one run.
    pub fn runs(&self) -> u8 {
        match self.runs_scored {
            Some(runs) => runs,
            None if self.scoring_play || self.outcome == OutcomeCode::HomeRun => 1,
            None => 0,
        }
    }

    /// Outs recorded by this action.
    pub fn outs(&self) -> u8 {
        self.outs_recorded
            .unwrap_or_else(|| self.outcome.default_outs())
    }
}

/// A play as submitted by a caller, with its result chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSubmission {
    /// Inning the action happened in.
    pub inning: u8,
    /// Half of the inning.
    pub half_inning: HalfInning,
    /// Outs before the action.
    #[serde(default)]
    pub outs_at_start: u8,
    /// Batting side's score before the action.
    #[serde(default)]
    pub batting_team_score_before: u16,
    /// Fielding side's score before the action, if the scorer tracked it.
    #[serde(default)]
    pub fielding_team_score_before: Option<u16>,
    /// Player the action is about.
    pub player_id: PlayerId,
    /// Wall-clock time of the action.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Balls in the count.
    #[serde(default)]
    pub ball_count: u8,
    /// Strikes in the count.
    #[serde(default)]
    pub strike_count: u8,
    /// Scorekeeping code; see [`OutcomeCode`].
    pub outcome: String,
    /// Free-form scorer's note.
    #[serde(default)]
    pub note: String,
    /// Pitch number within the appearance.
    #[serde(default)]
    pub pitch_sequence_number: u16,
    /// Whether a run scored.
    #[serde(default)]
    pub scoring_play: bool,
    /// Whether the plate appearance ended.
    #[serde(default)]
    pub terminal_for_appearance: bool,
    /// Runs scored, overriding the outcome's default.
    #[serde(default)]
    pub runs_scored: Option<u8>,
    /// Outs recorded, overriding the outcome's default.
    #[serde(default)]
    pub outs_recorded: Option<u8>,
    /// Events this action set off, in order.
    #[serde(default)]
    pub results: Vec<ActionSubmission>,
}

impl ActionSubmission {
    /// Starts a submission with zeroed counts and no results.
    pub fn new(inning: u8, half_inning: HalfInning, player_id: PlayerId, outcome: &str) -> Self {
        Self {
            inning,
            half_inning,
            outs_at_start: 0,
            batting_team_score_before: 0,
            fielding_team_score_before: None,
            player_id,
            timestamp: Utc::now(),
            ball_count: 0,
            strike_count: 0,
            outcome: outcome.to_string(),
            note: String::new(),
            pitch_sequence_number: 0,
            scoring_play: false,
            terminal_for_appearance: false,
            runs_scored: None,
            outs_recorded: None,
            results: Vec::new(),
        }
    }

    /// Sets the ball-strike count.
    pub fn with_count(mut self, balls: u8, strikes: u8) -> Self {
        self.ball_count = balls;
        self.strike_count = strikes;
        self
    }

    /// Sets the outs at the start of the action.
    pub fn with_outs_at_start(mut self, outs: u8) -> Self {
        self.outs_at_start = outs;
        self
    }

    /// Marks the action as scoring the given number of runs.
    pub fn scoring(mut self, runs: u8) -> Self {
        self.scoring_play = runs > 0;
        self.runs_scored = Some(runs);
        self
    }

    /// Overrides the outs the outcome records.
    pub fn recording_outs(mut self, outs: u8) -> Self {
        self.outs_recorded = Some(outs);
        self
    }

    /// Marks the plate appearance as ended.
    pub fn ending_appearance(mut self) -> Self {
        self.terminal_for_appearance = true;
        self
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Appends an event to the result chain.
    pub fn with_result(mut self, result: ActionSubmission) -> Self {
        self.results.push(result);
        self
    }

    /// Validates the whole tree.
    ///
    /// `check_player` decides whether an involved player is acceptable for
    /// this game and is called once per node.
    ///
    /// # Errors
    ///
    /// Returns the first [`GameError`] found; nothing is partially accepted.
    #[instrument(skip(self, check_player), fields(outcome = %self.outcome, inning = self.inning))]
    pub fn validate<F>(self, mut check_player: F) -> Result<ValidatedAction, GameError>
    where
        F: FnMut(PlayerId) -> Result<(), GameError>,
    {
        self.validate_at(1, &mut check_player)
    }

    fn validate_at<F>(self, depth: usize, check_player: &mut F) -> Result<ValidatedAction, GameError>
    where
        F: FnMut(PlayerId) -> Result<(), GameError>,
    {
        if depth > MAX_RESULT_DEPTH {
            return Err(GameError::validation(format!(
                "Result chain nested deeper than {}",
                MAX_RESULT_DEPTH
            )));
        }
        if self.inning == 0 {
            return Err(GameError::validation("Inning must be at least 1"));
        }
        if self.outs_at_start > 2 {
            return Err(GameError::validation(format!(
                "Outs at start must be 0-2, got {}",
                self.outs_at_start
            )));
        }
        if self.ball_count > 4 || self.strike_count > 3 {
            return Err(GameError::validation(format!(
                "Impossible count {}-{}",
                self.ball_count, self.strike_count
            )));
        }
        if self.outs_recorded.is_some_and(|outs| outs > 3) {
            return Err(GameError::validation("A play records at most 3 outs"));
        }
        if self.runs_scored.is_some_and(|runs| runs > 0) && !self.scoring_play {
            return Err(GameError::validation(
                "Runs scored on a play not marked as scoring",
            ));
        }
        let outcome = OutcomeCode::try_from(self.outcome)?;
        check_player(self.player_id)?;

        let results = self
            .results
            .into_iter()
            .map(|result| result.validate_at(depth + 1, check_player))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedAction {
            record: ActionRecord {
                inning: self.inning,
                half_inning: self.half_inning,
                outs_at_start: self.outs_at_start,
                batting_team_score_before: self.batting_team_score_before,
                fielding_team_score_before: self.fielding_team_score_before,
                player: self.player_id,
                timestamp: self.timestamp,
                ball_count: self.ball_count,
                strike_count: self.strike_count,
                outcome,
                note: self.note,
                pitch_sequence_number: self.pitch_sequence_number,
                scoring_play: self.scoring_play,
                terminal_for_appearance: self.terminal_for_appearance,
                runs_scored: self.runs_scored,
                outs_recorded: self.outs_recorded,
            },
            results,
        })
    }
}

/// A checked action tree, ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAction {
    record: ActionRecord,
    results: Vec<ValidatedAction>,
}

impl ValidatedAction {
    /// The top-level action of the tree.
    pub fn record(&self) -> &ActionRecord {
        &self.record
    }

    /// Number of actions in the tree, including the root.
    pub fn size(&self) -> usize {
        1 + self.results.iter().map(Self::size).sum::<usize>()
    }
}

/// A stored action and the ids of its results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ActionNode {
    id: ActionId,
    parent: Option<ActionId>,
    record: ActionRecord,
    results: Vec<ActionId>,
}

/// Append-only log of a game's actions.
///
/// Nodes live in one arena in insertion order; `roots` lists top-level
/// actions in append order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    nodes: Vec<ActionNode>,
    roots: Vec<ActionId>,
}

impl ActionLog {
    /// Appends a validated tree as a new top-level action.
    ///
    /// Returns the id of the root node.
    #[instrument(skip(self, action), fields(size = action.size()))]
    pub fn append(&mut self, action: ValidatedAction) -> ActionId {
        let root = self.insert(action, None);
        self.roots.push(root);
        debug!(root = %root, total = self.nodes.len(), "Action appended");
        root
    }

    fn insert(&mut self, action: ValidatedAction, parent: Option<ActionId>) -> ActionId {
        let id = ActionId(self.nodes.len());
        self.nodes.push(ActionNode {
            id,
            parent,
            record: action.record,
            results: Vec::new(),
        });
        let children: Vec<ActionId> = action
            .results
            .into_iter()
            .map(|result| self.insert(result, Some(id)))
            .collect();
        self.nodes[id.index()].results = children;
        id
    }

    /// Looks up a node.
    pub fn get(&self, id: ActionId) -> Option<&ActionNode> {
        self.nodes.get(id.index())
    }

    /// Top-level actions in append order.
    pub fn roots(&self) -> impl Iterator<Item = &ActionNode> {
        self.roots.iter().filter_map(|id| self.get(*id))
    }

    /// Result chain of a node, in order.
    pub fn results(&self, id: ActionId) -> impl Iterator<Item = &ActionNode> {
        self.get(id)
            .map(|node| node.results.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.get(*child))
    }

    /// Total number of stored actions, results included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of top-level actions.
    pub fn top_level_len(&self) -> usize {
        self.roots.len()
    }

    /// Checks whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks the log in play order.
    ///
    /// Each top-level action comes before its results, results come in
    /// chain order (depth first), and the next top-level action follows only
    /// after the whole tree.
    pub fn play_order(&self) -> PlayOrder<'_> {
        PlayOrder {
            log: self,
            pending: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Checks that inning and half never move backwards across top-level
    /// actions. Regressions are logged, not rejected.
    #[instrument(skip(self, next), fields(inning = next.record.inning))]
    pub fn check_progression(&self, next: &ValidatedAction) -> bool {
        let Some(last) = self.roots.last().and_then(|id| self.get(*id)) else {
            return true;
        };
        let before = (last.record.inning, last.record.half_inning);
        let after = (next.record.inning, next.record.half_inning);
        let same_half = before == after;
        let ok = after > before
            || (same_half && next.record.outs_at_start >= last.record.outs_at_start);
        if !ok {
            warn!(
                previous_inning = before.0,
                previous_half = %before.1,
                inning = after.0,
                half = %after.1,
                "Action recorded behind the previous one"
            );
        }
        ok
    }
}

/// Depth-first iterator over an [`ActionLog`]; see [`ActionLog::play_order`].
#[derive(Debug)]
pub struct PlayOrder<'a> {
    log: &'a ActionLog,
    pending: Vec<ActionId>,
}

impl<'a> Iterator for PlayOrder<'a> {
    type Item = &'a ActionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        let node = self.log.get(id)?;
        self.pending.extend(node.results.iter().rev().copied());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batter() -> PlayerId {
        PlayerId::from(1)
    }

    fn accept(_: PlayerId) -> Result<(), GameError> {
        Ok(())
    }

    #[test]
    fn outcome_codes_round_trip_through_strings() {
        assert_eq!(OutcomeCode::from_str("KL").unwrap(), OutcomeCode::StrikeoutLooking);
        assert_eq!(OutcomeCode::from_str("1B").unwrap(), OutcomeCode::Single);
        assert_eq!(OutcomeCode::PassedBall.code(), "PB");
        assert!(OutcomeCode::try_from("ZZ".to_string()).is_err());
    }

    #[test]
    fn default_outs_by_code() {
        assert_eq!(OutcomeCode::StrikeoutLooking.default_outs(), 1);
        assert_eq!(OutcomeCode::DoublePlay.default_outs(), 2);
        assert_eq!(OutcomeCode::TriplePlay.default_outs(), 3);
        assert_eq!(OutcomeCode::PassedBall.default_outs(), 0);
        assert_eq!(OutcomeCode::HomeRun.default_outs(), 0);
    }

    #[test]
    fn play_order_is_parent_then_results_depth_first() {
        let tree = ActionSubmission::new(1, HalfInning::Top, batter(), "KL")
            .with_result(
                ActionSubmission::new(1, HalfInning::Top, batter(), "PB")
                    .with_result(ActionSubmission::new(1, HalfInning::Top, batter(), "SB")),
            )
            .with_result(ActionSubmission::new(1, HalfInning::Top, batter(), "E"));

        let mut log = ActionLog::default();
        log.append(tree.validate(accept).unwrap());
        log.append(
            ActionSubmission::new(1, HalfInning::Top, batter(), "GO")
                .validate(accept)
                .unwrap(),
        );

        let codes: Vec<&str> = log
            .play_order()
            .map(|node| node.record().outcome().code())
            .collect();
        assert_eq!(codes, vec!["KL", "PB", "SB", "E", "GO"]);
        assert_eq!(log.len(), 5);
        assert_eq!(log.top_level_len(), 2);
    }

    #[test]
    fn results_point_back_to_parents() {
        let tree = ActionSubmission::new(1, HalfInning::Top, batter(), "KL")
            .with_result(ActionSubmission::new(1, HalfInning::Top, batter(), "PB"));
        let mut log = ActionLog::default();
        let root = log.append(tree.validate(accept).unwrap());

        let children: Vec<_> = log.results(root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(*children[0].parent(), Some(root));
        assert_eq!(root.index(), 0);
        assert_eq!(children[0].id().index(), 1);
        assert_eq!(serde_json::to_string(children[0].id()).unwrap(), "1");
    }

    #[test]
    fn invalid_result_rejects_whole_tree() {
        let tree = ActionSubmission::new(1, HalfInning::Top, batter(), "KL")
            .with_result(ActionSubmission::new(1, HalfInning::Top, batter(), "??"));
        assert!(matches!(tree.validate(accept), Err(GameError::Validation(_))));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut tree = ActionSubmission::new(1, HalfInning::Top, batter(), "B");
        for _ in 0..MAX_RESULT_DEPTH {
            tree = ActionSubmission::new(1, HalfInning::Top, batter(), "B").with_result(tree);
        }
        assert!(matches!(tree.validate(accept), Err(GameError::Validation(_))));
    }

    #[test]
    fn field_bounds_are_checked() {
        let base = || ActionSubmission::new(1, HalfInning::Top, batter(), "B");
        assert!(base().with_outs_at_start(3).validate(accept).is_err());
        assert!(base().with_count(5, 0).validate(accept).is_err());
        assert!(base().with_count(0, 4).validate(accept).is_err());
        assert!(base().recording_outs(4).validate(accept).is_err());
        assert!(ActionSubmission::new(0, HalfInning::Top, batter(), "B")
            .validate(accept)
            .is_err());

        let mut unflagged = base();
        unflagged.runs_scored = Some(1);
        assert!(unflagged.validate(accept).is_err());
    }

    #[test]
    fn progression_regressions_are_reported() {
        let mut log = ActionLog::default();
        log.append(
            ActionSubmission::new(3, HalfInning::Bottom, batter(), "B")
                .validate(accept)
                .unwrap(),
        );
        let earlier = ActionSubmission::new(2, HalfInning::Top, batter(), "B")
            .validate(accept)
            .unwrap();
        let later = ActionSubmission::new(4, HalfInning::Top, batter(), "B")
            .validate(accept)
            .unwrap();
        assert!(!log.check_progression(&earlier));
        assert!(log.check_progression(&later));
    }
}
