use crate::state::{Breach, RuleState, Transition};
use crate::ActionDispatcher;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use svcmon_common::types::MetricSource;
use svcmon_rules::ast::{Action, CheckTarget, ConditionExpr, RuleFile, Window};
use svcmon_services::{InitRegistry, InitSystem, ProcessStatus, ServiceStatus};
use thiserror::Error;

/// Load-time failure while compiling a rule file. Any error rejects
/// the whole file; no partial rule set is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown init system '{init}' for service '{service}'")]
    UnknownInitSystem { init: String, service: String },
}

/// The service a rule watches, with its resolved backend.
#[derive(Clone)]
pub struct ServiceTarget {
    pub service: String,
    pub backend: Arc<dyn InitSystem>,
}

impl fmt::Debug for ServiceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTarget")
            .field("service", &self.service)
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// One rule ready for evaluation: condition tree, debounce count
/// derived from the source window, and resolved action references.
pub struct CompiledRule {
    /// Stable identifier, unique within one load
    /// (`<target>/<first metric>`, suffixed on collision).
    pub id: String,
    /// `None` for `check host` rules.
    pub target: Option<ServiceTarget>,
    pub condition: ConditionExpr,
    /// Consecutive same-direction ticks required to commit a
    /// transition. Always at least 1; recovery uses the same count.
    pub debounce: u32,
    pub actions: Vec<Action>,
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("debounce", &self.debounce)
            .field("actions", &self.actions)
            .finish()
    }
}

/// Compiles a parsed rule file against the backend registry.
///
/// Debounce derivation: no window means immediate (a single sample,
/// the documented default); `for N cycles` means N consecutive ticks;
/// `for S seconds` means `ceil(S / cycle_seconds)` ticks, at least one.
///
/// # Errors
///
/// Fails if a check block names an init backend the registry cannot
/// supply, rejecting the entire file.
pub fn compile(
    file: &RuleFile,
    registry: &InitRegistry,
    cycle_seconds: u64,
) -> Result<Vec<Arc<CompiledRule>>, EvalError> {
    let mut rules = Vec::new();
    let mut seen: HashMap<String, u32> = HashMap::new();

    for check in &file.checks {
        let target = match &check.target {
            CheckTarget::Host => None,
            CheckTarget::Service(service) => {
                let backend = match &check.init {
                    Some(init) => {
                        registry
                            .get(init)
                            .ok_or_else(|| EvalError::UnknownInitSystem {
                                init: init.clone(),
                                service: service.clone(),
                            })?
                    }
                    None => registry.default_backend(),
                };
                Some(ServiceTarget {
                    service: service.clone(),
                    backend,
                })
            }
        };

        for rule in &check.rules {
            let base = format!("{}/{}", check.target, rule.condition.first_metric());
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            let id = if *n == 1 { base } else { format!("{base}#{n}") };

            rules.push(Arc::new(CompiledRule {
                id,
                target: target.clone(),
                condition: rule.condition.clone(),
                debounce: debounce_ticks(rule.window, cycle_seconds),
                actions: rule.actions.clone(),
            }));
        }
    }

    Ok(rules)
}

fn debounce_ticks(window: Window, cycle_seconds: u64) -> u32 {
    match window {
        Window::Immediate => 1,
        Window::Cycles(n) => n.max(1),
        // Saturate rather than truncate: a window of billions of ticks
        // is still a valid (if absurd) debounce.
        Window::Seconds(s) => u32::try_from(s.div_ceil(cycle_seconds.max(1)))
            .unwrap_or(u32::MAX)
            .max(1),
    }
}

/// Evaluates a condition tree against the current metric values.
/// A missing metric makes its comparison `Unknown`; conjunction follows
/// Kleene logic.
fn condition_breach(condition: &ConditionExpr, metrics: &dyn MetricSource) -> Breach {
    match condition {
        ConditionExpr::Compare {
            metric,
            op,
            threshold,
        } => match metrics.current_value(metric) {
            Some(value) => Breach::from_bool(op.check(value, *threshold)),
            None => Breach::Unknown,
        },
        ConditionExpr::And(lhs, rhs) => {
            condition_breach(lhs, metrics).and(condition_breach(rhs, metrics))
        }
    }
}

/// Holds the per-rule state table and drives one rule evaluation per
/// sampling tick.
///
/// Rule states live in a sharded map keyed by rule id, so concurrent
/// evaluation of unrelated rules never contends on a global lock while
/// each individual rule's state is updated by exactly one evaluation
/// at a time.
pub struct Evaluator {
    rules: Vec<Arc<CompiledRule>>,
    states: DashMap<String, RuleState>,
    dispatcher: Arc<dyn ActionDispatcher>,
}

impl Evaluator {
    pub fn new(rules: Vec<Arc<CompiledRule>>, dispatcher: Arc<dyn ActionDispatcher>) -> Self {
        Self {
            rules,
            states: DashMap::new(),
            dispatcher,
        }
    }

    pub fn rules(&self) -> &[Arc<CompiledRule>] {
        &self.rules
    }

    /// Current state snapshot for a rule, if it has ticked at least
    /// once.
    pub fn state(&self, rule_id: &str) -> Option<RuleState> {
        self.states.get(rule_id).map(|s| s.value().clone())
    }

    /// Clears all rule states; used on rule reload.
    pub fn reset(&self) {
        self.states.clear();
    }

    /// Applies one sampling tick to one rule. `status` is the fresh
    /// service lookup for service rules (`None` for host rules); a
    /// failed or timed-out lookup is passed as
    /// [`ProcessStatus::unknown`]. Ticks for one rule must arrive in
    /// time order.
    pub fn evaluate(
        &self,
        rule: &CompiledRule,
        metrics: &dyn MetricSource,
        status: Option<ProcessStatus>,
        now: DateTime<Utc>,
    ) -> Option<Transition> {
        let breach = match (&rule.target, status) {
            // A service rule whose process is not affirmatively up has
            // no trustworthy metrics this tick.
            (Some(_), Some(st)) if st.status != ServiceStatus::Up => Breach::Unknown,
            (Some(_), None) => Breach::Unknown,
            _ => condition_breach(&rule.condition, metrics),
        };

        let transition = {
            // Entry holds the shard lock: exclusive access to this
            // rule's state for the duration of the update.
            let mut state = self.states.entry(rule.id.clone()).or_default();
            state.step(breach, rule.debounce, now)
        };

        if let Some(transition) = transition {
            tracing::info!(
                rule = %rule.id,
                from = %transition.from,
                to = %transition.to,
                "Rule transition"
            );
            if transition.notifies() {
                self.dispatcher.dispatch(rule, &transition);
            }
        }

        transition
    }
}
