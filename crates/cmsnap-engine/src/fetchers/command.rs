//! Fetcher backed by an external command line tool.

use cmsnap_core::{FetchError, Fetcher, Scope};
use serde_json::Value;
use std::collections::BTreeSet;
use std::process::{Command, Output};
use std::thread;
use std::time::Duration;

const PROFILE_PLACEHOLDER: &str = "{profile}";
const APPLICATION_PLACEHOLDER: &str = "{application}";
const NAME_PLACEHOLDER: &str = "{name}";

/// Program and argument templates.
///
/// Arguments may contain `{profile}`, `{application}` and (for `get_args`)
/// `{name}`; each is replaced per call, so no ambient context is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub list_args: Vec<String>,
    pub get_args: Vec<String>,
}

impl Default for CommandSpec {
    fn default() -> Self {
        let scoped = |tail: &[&str]| -> Vec<String> {
            ["--context", PROFILE_PLACEHOLDER, "--namespace", APPLICATION_PLACEHOLDER]
                .iter()
                .chain(tail)
                .map(|s| s.to_string())
                .collect()
        };
        Self {
            program: "kubectl".to_string(),
            list_args: scoped(&["get", "configmaps", "-o", "json"]),
            get_args: scoped(&["get", "configmap", NAME_PLACEHOLDER, "-o", "json"]),
        }
    }
}

/// Linear back-off: attempt `n` waits `n * backoff` before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandFetcher {
    spec: CommandSpec,
    retry: RetryPolicy,
}

fn expand(templates: &[String], scope: &Scope, name: Option<&str>) -> Vec<String> {
    templates
        .iter()
        .map(|arg| {
            let arg = arg
                .replace(PROFILE_PLACEHOLDER, scope.profile())
                .replace(APPLICATION_PLACEHOLDER, scope.application());
            match name {
                Some(name) => arg.replace(NAME_PLACEHOLDER, name),
                None => arg,
            }
        })
        .collect()
}

/// kubectl reports a missing object as `Error from server (NotFound): ...`.
fn reports_not_found(stderr: &str) -> bool {
    stderr.contains("(NotFound)") || stderr.contains("not found")
}

fn is_retryable(err: &FetchError) -> bool {
    matches!(
        err,
        FetchError::CommandFailed { .. } | FetchError::InvalidOutput { .. }
    )
}

/// Names listed under `items[].metadata.name`.
fn parse_item_names(program: &str, document: &Value) -> Result<BTreeSet<String>, FetchError> {
    let invalid = |reason: &str| FetchError::InvalidOutput {
        source_name: program.to_string(),
        reason: reason.to_string(),
    };
    let items = document
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("missing 'items' list"))?;
    items
        .iter()
        .map(|item| {
            item.pointer("/metadata/name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| invalid("list item without metadata.name"))
        })
        .collect()
}

impl CommandFetcher {
    pub fn new(spec: CommandSpec, retry: RetryPolicy) -> Self {
        Self { spec, retry }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn run(&self, args: &[String]) -> Result<Output, FetchError> {
        Command::new(&self.spec.program)
            .args(args)
            .output()
            .map_err(|e| FetchError::Spawn {
                program: self.spec.program.clone(),
                reason: e.to_string(),
            })
    }

    /// Run once and parse stdout as JSON.
    fn run_json(&self, args: &[String], name: Option<&str>) -> Result<Value, FetchError> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if let Some(name) = name {
                if reports_not_found(&stderr) {
                    return Err(FetchError::ResourceVanished {
                        name: name.to_string(),
                    });
                }
            }
            return Err(FetchError::CommandFailed {
                program: self.spec.program.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }
        serde_json::from_slice(&output.stdout).map_err(|e| FetchError::InvalidOutput {
            source_name: self.spec.program.clone(),
            reason: e.to_string(),
        })
    }

    fn run_json_with_retry(&self, args: &[String], name: Option<&str>) -> Result<Value, FetchError> {
        let mut attempt = 0;
        loop {
            match self.run_json(args, name) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.retry.retries && is_retryable(&err) => {
                    attempt += 1;
                    tracing::warn!(
                        program = self.spec.program.as_str(),
                        attempt = attempt,
                        error = %err,
                        "Fetch failed, retrying"
                    );
                    thread::sleep(self.retry.backoff * attempt);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Fetcher for CommandFetcher {
    fn list_resource_names(&self, scope: &Scope) -> Result<BTreeSet<String>, FetchError> {
        let args = expand(&self.spec.list_args, scope, None);
        let document = self.run_json_with_retry(&args, None)?;
        parse_item_names(&self.spec.program, &document)
    }

    fn get_resource_definition(&self, scope: &Scope, name: &str) -> Result<Value, FetchError> {
        let args = expand(&self.spec.get_args, scope, Some(name));
        self.run_json_with_retry(&args, Some(name))
    }
}
