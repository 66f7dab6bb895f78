//! Host metric collectors.
//!
//! Each [`Collector`] fills its slice of the per-tick
//! [`MetricSnapshot`]. A collector failure logs a warning in the
//! sampling driver and leaves its metrics absent for that tick; it is
//! never fatal.

use anyhow::Result;
use svcmon_common::types::MetricSnapshot;

pub trait Collector: Send {
    /// Collector name (e.g. `"cpu"`, `"load"`), used for logging.
    fn name(&self) -> &str;

    /// Adds current values for this collector's metrics to `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying system interface cannot be
    /// read.
    fn collect(&mut self, snapshot: &mut MetricSnapshot) -> Result<()>;
}

/// Load averages from `/proc/loadavg`, exported as gauges
/// `host.load.1`, `host.load.5`, `host.load.15`. Unavailable on
/// non-Linux hosts.
pub struct LoadCollector;

impl Collector for LoadCollector {
    fn name(&self) -> &str {
        "load"
    }

    fn collect(&mut self, snapshot: &mut MetricSnapshot) -> Result<()> {
        let load = read_loadavg();
        snapshot.gauge("host.load.1", load.map(|l| l.0));
        snapshot.gauge("host.load.5", load.map(|l| l.1));
        snapshot.gauge("host.load.15", load.map(|l| l.2));
        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn read_loadavg() -> Option<(f64, f64, f64)> {
    let content = std::fs::read_to_string("/proc/loadavg").ok()?;
    parse_loadavg(&content)
}

#[cfg(not(target_os = "linux"))]
fn read_loadavg() -> Option<(f64, f64, f64)> {
    None
}

pub(crate) fn parse_loadavg(content: &str) -> Option<(f64, f64, f64)> {
    let mut fields = content.split_whitespace();
    let one = fields.next()?.parse().ok()?;
    let five = fields.next()?.parse().ok()?;
    let fifteen = fields.next()?.parse().ok()?;
    Some((one, five, fifteen))
}

/// Aggregate CPU usage from `/proc/stat`, exported as counters
/// `host.cpu` (total busy), `host.cpu.user`, `host.cpu.system`,
/// `host.cpu.iowait`, `host.cpu.steal`, each a percentage of the time
/// elapsed since the previous tick. The first tick (and every tick on
/// non-Linux hosts) reports zeros.
pub struct CpuCollector {
    prev: Option<CpuTimes>,
}

impl CpuCollector {
    pub fn new() -> Self {
        Self { prev: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub steal: u64,
}

impl CpuTimes {
    fn total(&self) -> u64 {
        self.user + self.nice + self.system + self.idle + self.iowait + self.steal
    }
}

/// Percentage shares of one sampling interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct CpuShares {
    pub busy: f64,
    pub user: f64,
    pub system: f64,
    pub iowait: f64,
    pub steal: f64,
}

impl Collector for CpuCollector {
    fn name(&self) -> &str {
        "cpu"
    }

    fn collect(&mut self, snapshot: &mut MetricSnapshot) -> Result<()> {
        let shares = match read_cpu_times() {
            Some(current) => {
                let shares = self
                    .prev
                    .map(|prev| cpu_shares(prev, current))
                    .unwrap_or_default();
                self.prev = Some(current);
                shares
            }
            None => CpuShares::default(),
        };
        snapshot.counter("host.cpu", shares.busy);
        snapshot.counter("host.cpu.user", shares.user);
        snapshot.counter("host.cpu.system", shares.system);
        snapshot.counter("host.cpu.iowait", shares.iowait);
        snapshot.counter("host.cpu.steal", shares.steal);
        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn read_cpu_times() -> Option<CpuTimes> {
    let content = std::fs::read_to_string("/proc/stat").ok()?;
    parse_cpu_line(content.lines().next()?)
}

#[cfg(not(target_os = "linux"))]
fn read_cpu_times() -> Option<CpuTimes> {
    None
}

/// Parses the aggregate `cpu` line of `/proc/stat`.
pub(crate) fn parse_cpu_line(line: &str) -> Option<CpuTimes> {
    let mut fields = line.split_whitespace();
    if fields.next()? != "cpu" {
        return None;
    }
    let mut next = || fields.next().and_then(|f| f.parse::<u64>().ok());
    let user = next()?;
    let nice = next()?;
    let system = next()?;
    let idle = next()?;
    let iowait = next().unwrap_or(0);
    let _irq = next().unwrap_or(0);
    let _softirq = next().unwrap_or(0);
    let steal = next().unwrap_or(0);
    Some(CpuTimes {
        user,
        nice,
        system,
        idle,
        iowait,
        steal,
    })
}

pub(crate) fn cpu_shares(prev: CpuTimes, current: CpuTimes) -> CpuShares {
    let total = current.total().saturating_sub(prev.total());
    if total == 0 {
        return CpuShares::default();
    }
    let pct = |now: u64, before: u64| now.saturating_sub(before) as f64 * 100.0 / total as f64;
    let idle = pct(current.idle, prev.idle);
    CpuShares {
        busy: 100.0 - idle,
        user: pct(current.user, prev.user),
        system: pct(current.system, prev.system),
        iowait: pct(current.iowait, prev.iowait),
        steal: pct(current.steal, prev.steal),
    }
}
