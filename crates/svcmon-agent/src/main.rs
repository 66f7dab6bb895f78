mod collector;
mod config;
mod dispatch;
mod sampler;


use anyhow::Result;
use collector::{CpuCollector, LoadCollector};
use config::AgentConfig;
use dispatch::LogDispatcher;
use sampler::Sampler;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use svcmon_eval::{compile, CompiledRule, Evaluator};
use svcmon_services::InitRegistry;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("svcmon=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/agent.toml".to_string());
    let config = AgentConfig::load(&config_path)?;
    tracing::info!(hostname = %config.hostname, "svcmon starting");

    // Explicit composition: platform backends would be probed here and
    // handed to the registry; the self backend is always available.
    let registry = InitRegistry::detect(Vec::new());

    let mut rules: Vec<Arc<CompiledRule>> = Vec::new();
    for path in &config.rule_files {
        match load_rule_file(path, &registry, config.cycle_seconds) {
            Ok(mut loaded) => {
                tracing::info!(file = %path.display(), rules = loaded.len(), "Rule file loaded");
                rules.append(&mut loaded);
            }
            // A broken file contributes nothing; other files still load.
            Err(e) => tracing::error!(file = %path.display(), error = %e, "Rule file rejected"),
        }
    }
    if rules.is_empty() {
        tracing::warn!("No rules loaded; monitoring host metrics only");
    }

    let dispatcher = Arc::new(LogDispatcher::new(Duration::from_secs(
        config.service_timeout_secs,
    )));
    let evaluator = Arc::new(Evaluator::new(rules, dispatcher));
    let collectors: Vec<Box<dyn collector::Collector>> =
        vec![Box::new(CpuCollector::new()), Box::new(LoadCollector)];

    Sampler::new(config, evaluator, collectors).run().await
}

fn load_rule_file(
    path: &Path,
    registry: &InitRegistry,
    cycle_seconds: u64,
) -> Result<Vec<Arc<CompiledRule>>> {
    let source = std::fs::read_to_string(path)?;
    let file = svcmon_rules::parse_str(&source)?;
    Ok(compile(&file, registry, cycle_seconds)?)
}
