use crate::self_init::SelfInit;
use crate::InitSystem;
use std::collections::HashMap;
use std::sync::Arc;

/// Name-keyed registry of the init backends available on this host.
///
/// Built once at startup by an explicit composition step
/// ([`InitRegistry::detect`]); read-only afterwards. Rule compilation
/// resolves each check block's backend against it and fails the load
/// when the named backend is missing.
pub struct InitRegistry {
    backends: HashMap<String, Arc<dyn InitSystem>>,
    default_name: String,
}

impl InitRegistry {
    /// Composes the registry from the platform backends probed at
    /// startup. The self backend is always present; the first probed
    /// backend becomes the default for `check service` blocks without
    /// a `with init` clause, falling back to `self` when none were
    /// found.
    pub fn detect(probed: Vec<Arc<dyn InitSystem>>) -> Self {
        let mut registry = Self {
            backends: HashMap::new(),
            default_name: probed
                .first()
                .map(|b| b.name().to_string())
                .unwrap_or_else(|| "self".to_string()),
        };
        for backend in probed {
            registry.register(backend);
        }
        registry.register(Arc::new(SelfInit));
        tracing::info!(
            backends = ?registry.names(),
            default = %registry.default_name,
            "Init backends composed"
        );
        registry
    }

    fn register(&mut self, backend: Arc<dyn InitSystem>) {
        self.backends.insert(backend.name().to_string(), backend);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn InitSystem>> {
        self.backends.get(name).cloned()
    }

    pub fn default_backend(&self) -> Arc<dyn InitSystem> {
        // The default name always refers to a registered backend.
        self.backends[&self.default_name].clone()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.backends.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
