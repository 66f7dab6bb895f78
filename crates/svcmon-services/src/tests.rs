use crate::registry::InitRegistry;
use crate::self_init::{SelfInit, SELF_SERVICE};
use crate::{InitSystem, ProcessStatus, ServiceCause, ServiceError, ServiceStatus};
use std::sync::Arc;

#[test]
fn self_backend_reports_own_process_up() {
    let init = SelfInit;
    let status = init.lookup_service(SELF_SERVICE).unwrap();
    assert_eq!(status.pid, std::process::id());
    assert_eq!(status.status, ServiceStatus::Up);
}

#[test]
fn self_backend_yields_not_found_for_any_other_name() {
    let init = SelfInit;
    for name in ["memcached", "sshd", ""] {
        let err = init.lookup_service(name).unwrap_err();
        assert!(err.is_not_found(), "expected NotFound for {name:?}");
        assert_eq!(err.init, "self");
        assert_eq!(err.service, name);
    }
}

#[test]
fn self_backend_refuses_restart_and_reload() {
    let init = SelfInit;
    let restart = init.restart(SELF_SERVICE).unwrap_err();
    assert!(matches!(restart.cause, ServiceCause::Unsupported(_)));
    let reload = init.reload(SELF_SERVICE).unwrap_err();
    assert!(matches!(reload.cause, ServiceCause::Unsupported(_)));
}

#[test]
fn not_found_is_distinguishable_from_backend_failure() {
    let not_found = ServiceError::not_found("systemd", "ghost");
    assert!(not_found.is_not_found());

    let refused = ServiceError {
        init: "systemd".to_string(),
        service: "sshd".to_string(),
        cause: ServiceCause::Backend("unit masked".to_string()),
    };
    assert!(!refused.is_not_found());
}

struct FakeInit(&'static str);

impl InitSystem for FakeInit {
    fn name(&self) -> &str {
        self.0
    }
    fn restart(&self, _service: &str) -> Result<(), ServiceError> {
        Ok(())
    }
    fn reload(&self, _service: &str) -> Result<(), ServiceError> {
        Ok(())
    }
    fn lookup_service(&self, _service: &str) -> Result<ProcessStatus, ServiceError> {
        Ok(ProcessStatus::up(1))
    }
}

#[test]
fn registry_always_contains_self_and_defaults_to_first_probed() {
    let registry = InitRegistry::detect(vec![Arc::new(FakeInit("systemd"))]);
    assert_eq!(registry.names(), vec!["self", "systemd"]);
    assert_eq!(registry.default_backend().name(), "systemd");
    assert!(registry.get("self").is_some());
    assert!(registry.get("upstart").is_none());
}

#[test]
fn registry_without_probed_backends_defaults_to_self() {
    let registry = InitRegistry::detect(Vec::new());
    assert_eq!(registry.default_backend().name(), "self");
}
