//! Per-rule debounced hysteresis state machine.

use chrono::{DateTime, Utc};
use std::fmt;

/// Health level of one rule, ordered from best to worst. `Unknown` is
/// only the pre-first-sample state; transitions move one step at a time
/// along `Ok ↔ Warning ↔ Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleLevel {
    Unknown,
    Ok,
    Warning,
    Critical,
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLevel::Unknown => f.write_str("unknown"),
            RuleLevel::Ok => f.write_str("ok"),
            RuleLevel::Warning => f.write_str("warning"),
            RuleLevel::Critical => f.write_str("critical"),
        }
    }
}

/// Tri-valued condition result. A missing metric or unqueryable service
/// yields `Unknown`, which counts toward a breach but never escalates
/// past `Warning` on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breach {
    No,
    Yes,
    Unknown,
}

impl Breach {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Breach::Yes
        } else {
            Breach::No
        }
    }

    /// Kleene conjunction: `No` dominates, then `Unknown`.
    pub fn and(self, other: Breach) -> Breach {
        match (self, other) {
            (Breach::No, _) | (_, Breach::No) => Breach::No,
            (Breach::Unknown, _) | (_, Breach::Unknown) => Breach::Unknown,
            (Breach::Yes, Breach::Yes) => Breach::Yes,
        }
    }
}

/// A committed level change, reported once per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RuleLevel,
    pub to: RuleLevel,
    pub at: DateTime<Utc>,
}

impl Transition {
    /// Whether this transition should reach the action dispatcher.
    /// Worsening transitions always notify; recovery notifies only on
    /// the return to `Ok`, and the initial settle from `Unknown` to
    /// `Ok` is silent.
    pub fn notifies(&self) -> bool {
        match self.to {
            RuleLevel::Warning | RuleLevel::Critical => self.to > self.from,
            RuleLevel::Ok => self.from != RuleLevel::Unknown,
            RuleLevel::Unknown => false,
        }
    }
}

/// Mutable per-rule record. One instance per compiled rule, owned by
/// the evaluator for the monitoring session and reset only on rule
/// reload. The breach and recovery streaks are independent consecutive
/// runs: a tick in one direction zeroes only the opposite streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleState {
    pub level: RuleLevel,
    pub breach_streak: u32,
    pub recovery_streak: u32,
    pub last_transition: Option<DateTime<Utc>>,
}

impl Default for RuleState {
    fn default() -> Self {
        Self {
            level: RuleLevel::Unknown,
            breach_streak: 0,
            recovery_streak: 0,
            last_transition: None,
        }
    }
}

impl RuleState {
    /// Applies one sampling tick. Returns the transition committed on
    /// this tick, if any; at most one per call, and a sustained breach
    /// at the same level never re-fires.
    pub fn step(&mut self, breach: Breach, debounce: u32, now: DateTime<Utc>) -> Option<Transition> {
        debug_assert!(debounce >= 1);
        match breach {
            Breach::Yes | Breach::Unknown => {
                self.breach_streak += 1;
                self.recovery_streak = 0;
                if self.breach_streak < debounce {
                    return None;
                }
                self.breach_streak = 0;
                let target = match (self.level, breach) {
                    (RuleLevel::Unknown | RuleLevel::Ok, _) => RuleLevel::Warning,
                    (RuleLevel::Warning, Breach::Yes) => RuleLevel::Critical,
                    // Unknown data alone never escalates to Critical.
                    (RuleLevel::Warning, _) => RuleLevel::Warning,
                    (RuleLevel::Critical, _) => RuleLevel::Critical,
                };
                self.commit(target, now)
            }
            Breach::No => {
                self.recovery_streak += 1;
                self.breach_streak = 0;
                if self.recovery_streak < debounce {
                    return None;
                }
                self.recovery_streak = 0;
                let target = match self.level {
                    RuleLevel::Critical => RuleLevel::Warning,
                    _ => RuleLevel::Ok,
                };
                self.commit(target, now)
            }
        }
    }

    fn commit(&mut self, target: RuleLevel, now: DateTime<Utc>) -> Option<Transition> {
        if target == self.level {
            return None;
        }
        let transition = Transition {
            from: self.level,
            to: target,
            at: now,
        };
        self.level = target;
        self.last_transition = Some(now);
        Some(transition)
    }
}
