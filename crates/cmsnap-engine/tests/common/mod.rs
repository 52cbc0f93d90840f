use cmsnap_core::{FetchError, Fetcher, Scope};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// In-memory stand-in for the platform, keyed by `profile/application`.
#[derive(Default)]
pub struct MemoryFetcher {
    scopes: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    /// Resource names whose fetch fails
    failing: Mutex<BTreeSet<String>>,
}

#[allow(dead_code)]
impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the resources of `scope` with the entries of a JSON object.
    pub fn set(&self, scope: &Scope, resources: Value) {
        let map = resources
            .as_object()
            .expect("fixture must be a JSON object")
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.scopes.lock().unwrap().insert(scope.to_string(), map);
    }

    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }
}

impl Fetcher for MemoryFetcher {
    fn list_resource_names(&self, scope: &Scope) -> Result<BTreeSet<String>, FetchError> {
        Ok(self
            .scopes
            .lock()
            .unwrap()
            .get(&scope.to_string())
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn get_resource_definition(&self, scope: &Scope, name: &str) -> Result<Value, FetchError> {
        if self.failing.lock().unwrap().contains(name) {
            return Err(FetchError::CommandFailed {
                program: "memory".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("connection reset while fetching {}", name),
            });
        }
        self.scopes
            .lock()
            .unwrap()
            .get(&scope.to_string())
            .and_then(|m| m.get(name).cloned())
            .ok_or_else(|| FetchError::ResourceVanished {
                name: name.to_string(),
            })
    }
}
