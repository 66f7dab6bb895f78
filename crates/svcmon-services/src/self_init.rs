use crate::{InitSystem, ProcessStatus, ServiceCause, ServiceError};

/// The service name the self backend answers for.
pub const SELF_SERVICE: &str = "svcmon";

/// Reports on the monitor's own process. Useful when running svcmon
/// under a supervisor it has no backend for, or standalone during
/// development; otherwise the monitor cannot find itself as a service.
#[derive(Debug, Default)]
pub struct SelfInit;

impl InitSystem for SelfInit {
    fn name(&self) -> &str {
        "self"
    }

    fn restart(&self, service: &str) -> Result<(), ServiceError> {
        Err(ServiceError {
            init: self.name().to_string(),
            service: service.to_string(),
            cause: ServiceCause::Unsupported("cannot restart myself".to_string()),
        })
    }

    fn reload(&self, service: &str) -> Result<(), ServiceError> {
        Err(ServiceError {
            init: self.name().to_string(),
            service: service.to_string(),
            cause: ServiceCause::Unsupported("cannot reload myself".to_string()),
        })
    }

    fn lookup_service(&self, service: &str) -> Result<ProcessStatus, ServiceError> {
        if service == SELF_SERVICE {
            return Ok(ProcessStatus::up(std::process::id()));
        }
        Err(ServiceError::not_found(self.name(), service))
    }
}
