//! Fetcher reading exported definitions from `<dir>/<profile>/<application>/*.json`.

use cmsnap_core::{FetchError, Fetcher, Scope};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DEFINITION_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn scope_dir(&self, scope: &Scope) -> PathBuf {
        self.root.join(scope.profile()).join(scope.application())
    }
}

fn source_error(path: &Path, err: impl ToString) -> FetchError {
    FetchError::Source {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

impl Fetcher for DirectoryFetcher {
    fn list_resource_names(&self, scope: &Scope) -> Result<BTreeSet<String>, FetchError> {
        let dir = self.scope_dir(scope);
        let entries = fs::read_dir(&dir).map_err(|e| source_error(&dir, e))?;

        let mut names = BTreeSet::new();
        for entry in entries {
            let path = entry.map_err(|e| source_error(&dir, e))?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(DEFINITION_EXTENSION)
            {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if !stem.starts_with('.') => {
                    names.insert(stem.to_string());
                }
                _ => {}
            }
        }
        Ok(names)
    }

    fn get_resource_definition(&self, scope: &Scope, name: &str) -> Result<Value, FetchError> {
        let path = self
            .scope_dir(scope)
            .join(format!("{}.{}", name, DEFINITION_EXTENSION));
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::ResourceVanished {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(source_error(&path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| FetchError::InvalidOutput {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
