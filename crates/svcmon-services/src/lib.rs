//! Process-supervision backends.
//!
//! An [`InitSystem`] answers "is this named service running?" and
//! exposes restart/reload primitives, abstracting over systemd, SysV
//! init, upstart, launchd and the monitor's own process. Backends are
//! composed into an [`InitRegistry`] once at startup; the registry is
//! read-only afterwards and rule compilation resolves backends by name
//! against it.

pub mod registry;
pub mod self_init;

#[cfg(test)]
mod tests;

pub use registry::InitRegistry;
pub use self_init::{SelfInit, SELF_SERVICE};

use thiserror::Error;

/// Running state of a supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Up,
    Down,
    Unknown,
}

/// Result of one service lookup. Produced fresh on every query and
/// never cached across sampling ticks; `pid` is meaningful only when
/// `status` is [`ServiceStatus::Up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    pub pid: u32,
    pub status: ServiceStatus,
}

impl ProcessStatus {
    pub fn up(pid: u32) -> Self {
        Self {
            pid,
            status: ServiceStatus::Up,
        }
    }

    /// Status for a failed or timed-out query.
    pub fn unknown() -> Self {
        Self {
            pid: 0,
            status: ServiceStatus::Unknown,
        }
    }
}

/// Why a backend operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceCause {
    /// The backend supervises no service by that name. Distinguished so
    /// callers can branch on it without string inspection.
    #[error("no such service")]
    NotFound,

    /// The backend cannot perform the operation at all (e.g. a process
    /// cannot restart itself).
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// The backend tried and failed.
    #[error("{0}")]
    Backend(String),
}

/// The only error type crossing the service-abstraction boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{init}: service '{service}': {cause}")]
pub struct ServiceError {
    /// Name of the init system that failed.
    pub init: String,
    /// Name of the service being resolved.
    pub service: String,
    #[source]
    pub cause: ServiceCause,
}

impl ServiceError {
    pub fn not_found(init: &str, service: &str) -> Self {
        Self {
            init: init.to_string(),
            service: service.to_string(),
            cause: ServiceCause::NotFound,
        }
    }

    /// Sentinel check: was this a "no such service" failure?
    pub fn is_not_found(&self) -> bool {
        self.cause == ServiceCause::NotFound
    }
}

/// Capability interface every process-supervision backend satisfies.
///
/// Implementations may shell out or perform slow system calls; callers
/// are expected to bound each query with a timeout and treat timeouts
/// as an unknown status.
pub trait InitSystem: Send + Sync {
    /// Backend name used in `with init <name>` clauses (e.g.
    /// `"systemd"`, `"launchd"`, `"self"`).
    fn name(&self) -> &str;

    /// Restarts the named service.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the backend refuses or the service
    /// is unknown.
    fn restart(&self, service: &str) -> Result<(), ServiceError>;

    /// Reloads the named service's configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the backend refuses or the service
    /// is unknown.
    fn reload(&self, service: &str) -> Result<(), ServiceError>;

    /// Resolves the current status of the named service.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] whose cause is
    /// [`ServiceCause::NotFound`] when the backend has no such service.
    fn lookup_service(&self, service: &str) -> Result<ProcessStatus, ServiceError>;
}
