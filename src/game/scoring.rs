//! Folding the play log into score, outs and inning.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{ActionLog, ActionNode, HalfInning, Side};

/// When a game counts as finished, and what finishing means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RegulationRule {
    /// Innings in a regulation game.
    #[serde(default = "default_regulation_innings")]
    regulation_innings: u8,
    /// Whether a game tied after a full regulation inning ends there.
    #[serde(default)]
    allow_ties: bool,
    /// Whether a finished game rejects further changes.
    #[serde(default = "default_close_on_completion")]
    close_on_completion: bool,
}

fn default_regulation_innings() -> u8 {
    9
}

fn default_close_on_completion() -> bool {
    true
}

impl Default for RegulationRule {
    fn default() -> Self {
        Self {
            regulation_innings: default_regulation_innings(),
            allow_ties: false,
            close_on_completion: default_close_on_completion(),
        }
    }
}

impl RegulationRule {
    /// Creates a rule. Innings below 1 are raised to 1.
    pub fn new(regulation_innings: u8, allow_ties: bool, close_on_completion: bool) -> Self {
        Self {
            regulation_innings: regulation_innings.max(1),
            allow_ties,
            close_on_completion,
        }
    }
}

/// Runs per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Score {
    visiting: u16,
    home: u16,
}

impl Score {
    /// Runs for one side.
    pub fn of(&self, side: Side) -> u16 {
        match side {
            Side::Visiting => self.visiting,
            Side::Home => self.home,
        }
    }

    fn add(&mut self, side: Side, runs: u8) {
        let total = match side {
            Side::Visiting => &mut self.visiting,
            Side::Home => &mut self.home,
        };
        *total = total.saturating_add(u16::from(runs));
    }
}

/// Game situation after folding some prefix of the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Scoreboard {
    inning: u8,
    half: HalfInning,
    outs: u8,
    score: Score,
    complete: bool,
    applied: usize,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            inning: 1,
            half: HalfInning::Top,
            outs: 0,
            score: Score::default(),
            complete: false,
            applied: 0,
        }
    }
}

impl Scoreboard {
    /// Folds an entire log in play order.
    #[instrument(skip(log, rule), fields(actions = log.len()))]
    pub fn replay(log: &ActionLog, rule: &RegulationRule) -> Self {
        let mut board = Self::default();
        for node in log.play_order() {
            board.apply(node, rule);
        }
        debug!(
            inning = board.inning,
            half = %board.half,
            outs = board.outs,
            visiting = board.score.visiting,
            home = board.score.home,
            complete = board.complete,
            "Log replayed"
        );
        board
    }

    /// Applies one action's own effect. Results are separate nodes.
    pub fn apply(&mut self, node: &ActionNode, rule: &RegulationRule) {
        if self.complete {
            warn!(action = %node.id(), "Action after game completion ignored");
            return;
        }
        let record = node.record();
        self.applied += 1;

        let batting = self.half.batting_side();
        self.score.add(batting, record.runs());
        if self.is_walk_off(rule) {
            info!(inning = self.inning, "Walk-off");
            self.complete = true;
            return;
        }

        self.outs = self.outs.saturating_add(record.outs()).min(3);
        if self.outs == 3 {
            self.end_half(rule);
        }
    }

    /// Side ahead once the game is complete; `None` while in progress or tied.
    pub fn winner(&self) -> Option<Side> {
        if !self.complete {
            return None;
        }
        match self.score.visiting.cmp(&self.score.home) {
            std::cmp::Ordering::Greater => Some(Side::Visiting),
            std::cmp::Ordering::Less => Some(Side::Home),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn is_walk_off(&self, rule: &RegulationRule) -> bool {
        self.half == HalfInning::Bottom
            && self.inning >= rule.regulation_innings
            && self.score.home > self.score.visiting
    }

    fn end_half(&mut self, rule: &RegulationRule) {
        let late = self.inning >= rule.regulation_innings;
        match self.half {
            HalfInning::Top if late && self.score.home > self.score.visiting => {
                debug!(inning = self.inning, "Home team ahead, bottom half not needed");
                self.complete = true;
            }
            HalfInning::Top => {
                self.half = HalfInning::Bottom;
                self.outs = 0;
            }
            HalfInning::Bottom
                if late && (self.score.home != self.score.visiting || rule.allow_ties) =>
            {
                debug!(inning = self.inning, "Regulation satisfied");
                self.complete = true;
            }
            HalfInning::Bottom => {
                self.inning = self.inning.saturating_add(1);
                self.half = HalfInning::Top;
                self.outs = 0;
            }
        }
    }
}
