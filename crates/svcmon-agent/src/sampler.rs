//! Periodic sampling driver.

use crate::collector::Collector;
use crate::config::AgentConfig;
use chrono::Utc;
use std::sync::Arc;
use svcmon_common::types::MetricSnapshot;
use svcmon_eval::{CompiledRule, Evaluator};
use svcmon_services::ProcessStatus;
use tokio::net::UdpSocket;
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{interval, timeout, Duration};

pub struct Sampler {
    config: AgentConfig,
    evaluator: Arc<Evaluator>,
    collectors: Vec<Box<dyn Collector>>,
}

impl Sampler {
    pub fn new(
        config: AgentConfig,
        evaluator: Arc<Evaluator>,
        collectors: Vec<Box<dyn Collector>>,
    ) -> Self {
        Self {
            config,
            evaluator,
            collectors,
        }
    }

    /// Runs the sampling loop until interrupted. Shutdown lets the
    /// in-flight tick drain its rule evaluations (each bounded by the
    /// service-lookup timeout) before returning.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut tick = interval(Duration::from_secs(self.config.cycle_seconds));

        tracing::info!(
            cycle_seconds = self.config.cycle_seconds,
            rules = self.evaluator.rules().len(),
            workers = self.config.worker_count,
            "Starting sampling loop"
        );

        loop {
            tokio::select! {
                _ = tick.tick() => self.cycle().await,
                _ = signal::ctrl_c() => {
                    tracing::info!("Shutting down");
                    break;
                }
            }
        }
        Ok(())
    }

    async fn cycle(&mut self) {
        let mut snapshot = MetricSnapshot::new();
        for collector in &mut self.collectors {
            if let Err(e) = collector.collect(&mut snapshot) {
                tracing::warn!(collector = collector.name(), error = %e, "Collection failed");
            }
        }
        tracing::debug!(metrics = snapshot.len(), "Collected snapshot");

        if let Some(endpoint) = &self.config.statsd_endpoint {
            push_statsd(endpoint, &self.config.hostname, &snapshot).await;
        }

        let snapshot = Arc::new(snapshot);
        let now = Utc::now();
        let semaphore = Arc::new(Semaphore::new(self.config.worker_count.max(1)));
        let lookup_timeout = Duration::from_secs(self.config.service_timeout_secs);

        let mut evaluations = JoinSet::new();
        for rule in self.evaluator.rules().iter().cloned() {
            let semaphore = semaphore.clone();
            let evaluator = self.evaluator.clone();
            let snapshot = snapshot.clone();
            evaluations.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let status = query_status(&rule, lookup_timeout).await;
                evaluator.evaluate(&rule, snapshot.as_ref(), status, now);
            });
        }
        // The tick is done only when every dispatched evaluation is.
        while evaluations.join_next().await.is_some() {}
    }
}

/// Fresh service lookup for one rule, bounded by `lookup_timeout`.
/// Backends may block in system calls or subprocesses, so the query
/// runs on the blocking pool; any failure or timeout degrades to an
/// unknown status rather than stalling the tick.
async fn query_status(rule: &Arc<CompiledRule>, lookup_timeout: Duration) -> Option<ProcessStatus> {
    let target = rule.target.as_ref()?;
    let backend = target.backend.clone();
    let init = backend.name().to_string();
    let service = target.service.clone();

    let lookup =
        tokio::task::spawn_blocking(move || backend.lookup_service(&service));
    match timeout(lookup_timeout, lookup).await {
        Ok(Ok(Ok(status))) => Some(status),
        Ok(Ok(Err(e))) => {
            tracing::warn!(rule = %rule.id, error = %e, "Service lookup failed");
            Some(ProcessStatus::unknown())
        }
        Ok(Err(e)) => {
            tracing::warn!(rule = %rule.id, error = %e, "Service lookup panicked");
            Some(ProcessStatus::unknown())
        }
        Err(_) => {
            tracing::warn!(rule = %rule.id, init = %init, "Service lookup timed out");
            Some(ProcessStatus::unknown())
        }
    }
}

/// Fire-and-forget statsd push; send failures are logged and never
/// affect the tick.
async fn push_statsd(endpoint: &str, hostname: &str, snapshot: &MetricSnapshot) {
    let payload = svcmon_export::render(hostname, snapshot);
    match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => {
            if let Err(e) = socket.send_to(payload.as_bytes(), endpoint).await {
                tracing::warn!(endpoint, error = %e, "Statsd push failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Statsd socket unavailable"),
    }
}
