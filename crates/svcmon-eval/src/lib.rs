//! Rule evaluation engine.
//!
//! [`engine::compile`] turns a parsed rule file into [`CompiledRule`]s,
//! resolving each check block's init backend against the registry and
//! deriving the debounce count from the rule's window. At runtime the
//! [`engine::Evaluator`] holds one [`state::RuleState`] per rule and,
//! once per sampling tick, evaluates the rule's condition against the
//! current metrics and service status, stepping the per-rule hysteresis
//! state machine and dispatching on transitions.

pub mod engine;
pub mod state;


pub use engine::{compile, CompiledRule, EvalError, Evaluator, ServiceTarget};
pub use state::{Breach, RuleLevel, RuleState, Transition};

/// Receiver of state-transition events.
///
/// Dispatch is fire-and-forget from the evaluator's perspective:
/// implementations log their own failures and never block or fail the
/// sampling tick.
pub trait ActionDispatcher: Send + Sync {
    fn dispatch(&self, rule: &CompiledRule, transition: &Transition);
}
