use std::sync::Arc;
use svcmon_eval::{ActionDispatcher, CompiledRule, RuleLevel, Transition};
use svcmon_rules::ast::Action;
use svcmon_services::InitSystem;
use tokio::time::{timeout, Duration};

/// Default dispatcher: logs alerts through `tracing` and invokes
/// restart/reload on the rule's backend for worsening transitions.
///
/// Dispatch must never block or fail the sampling tick, so backend
/// control calls (which may shell out or hang in system calls) are
/// handed to the blocking pool and bounded by the same timeout the
/// sampler applies to service lookups; `dispatch` itself only logs and
/// spawns.
pub struct LogDispatcher {
    action_timeout: Duration,
}

impl LogDispatcher {
    pub fn new(action_timeout: Duration) -> Self {
        Self { action_timeout }
    }
}

impl ActionDispatcher for LogDispatcher {
    fn dispatch(&self, rule: &CompiledRule, transition: &Transition) {
        let worsened = transition.to > transition.from && transition.to != RuleLevel::Ok;

        for action in &rule.actions {
            match action {
                Action::Alert => {
                    if transition.to == RuleLevel::Critical {
                        tracing::error!(
                            rule = %rule.id,
                            from = %transition.from,
                            to = %transition.to,
                            "Alert"
                        );
                    } else if worsened {
                        tracing::warn!(
                            rule = %rule.id,
                            from = %transition.from,
                            to = %transition.to,
                            "Alert"
                        );
                    } else {
                        tracing::info!(rule = %rule.id, "Recovered");
                    }
                }
                Action::Restart if worsened => {
                    let Some(target) = &rule.target else { continue };
                    spawn_control(
                        "restart",
                        rule.id.clone(),
                        target.service.clone(),
                        target.backend.clone(),
                        self.action_timeout,
                        |backend, service| backend.restart(service),
                    );
                }
                Action::Reload if worsened => {
                    let Some(target) = &rule.target else { continue };
                    spawn_control(
                        "reload",
                        rule.id.clone(),
                        target.service.clone(),
                        target.backend.clone(),
                        self.action_timeout,
                        |backend, service| backend.reload(service),
                    );
                }
                // Restart/reload never run on recovery transitions.
                Action::Restart | Action::Reload => {}
            }
        }
    }
}

/// Runs one backend control call off the tick path. Failures and
/// timeouts are logged here and go nowhere else.
fn spawn_control<F>(
    verb: &'static str,
    rule_id: String,
    service: String,
    backend: Arc<dyn InitSystem>,
    action_timeout: Duration,
    call: F,
) where
    F: FnOnce(&dyn InitSystem, &str) -> Result<(), svcmon_services::ServiceError>
        + Send
        + 'static,
{
    tokio::spawn(async move {
        let blocking_service = service.clone();
        let call =
            tokio::task::spawn_blocking(move || call(backend.as_ref(), &blocking_service));
        match timeout(action_timeout, call).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!(rule = %rule_id, service = %service, "{verb} succeeded")
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!(rule = %rule_id, error = %e, "{verb} refused")
            }
            Ok(Err(e)) => {
                tracing::warn!(rule = %rule_id, error = %e, "{verb} panicked")
            }
            Err(_) => {
                tracing::warn!(rule = %rule_id, service = %service, "{verb} timed out")
            }
        }
    });
}
