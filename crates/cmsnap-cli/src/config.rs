//! `cmsnap.toml` configuration.
//!
//! Every field has a default; command-line flags override file values.

use anyhow::{bail, Context, Result};
use cmsnap_core::diff::{DiffOptions, KeyPath};
use cmsnap_core::Fetcher;
use cmsnap_engine::commands::CaptureOptions;
use cmsnap_engine::fetchers::{CommandFetcher, CommandSpec, DirectoryFetcher, RetryPolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cmsnap.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Snapshot store root
    pub root: PathBuf,
    /// Report output root
    pub out: PathBuf,
    pub fetch: FetchConfig,
    pub diff: DiffConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("snapshots"),
            out: PathBuf::from("reports"),
            fetch: FetchConfig::default(),
            diff: DiffConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub workers: usize,
    pub retries: u32,
    pub retry_backoff_ms: u64,
    pub program: String,
    pub list_args: Vec<String>,
    pub get_args: Vec<String>,
    /// Read exported definitions from this directory instead of running
    /// `program`
    pub source_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let spec = CommandSpec::default();
        let retry = RetryPolicy::default();
        Self {
            workers: CaptureOptions::default().workers,
            retries: retry.retries,
            retry_backoff_ms: retry.backoff.as_millis() as u64,
            program: spec.program,
            list_args: spec.list_args,
            get_args: spec.get_args,
            source_dir: None,
        }
    }
}

/// Fields the platform rewrites on every update. Comparing them would flag
/// every changed ConfigMap twice.
pub const DEFAULT_IGNORE: [&str; 5] = [
    "metadata.resourceVersion",
    "metadata.managedFields",
    "metadata.uid",
    "metadata.creationTimestamp",
    "metadata.generation",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Key paths excluded from comparison. Setting this replaces
    /// [`DEFAULT_IGNORE`]; `ignore = []` compares everything.
    pub ignore: Vec<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load `explicit` if given, else `cmsnap.toml` if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.workers == 0 {
            bail!("fetch.workers must be at least 1");
        }
        if self.fetch.program.trim().is_empty() && self.fetch.source_dir.is_none() {
            bail!("fetch.program must not be empty");
        }
        self.diff_options()?;
        Ok(())
    }

    pub fn diff_options(&self) -> Result<DiffOptions> {
        let paths = self
            .diff
            .ignore
            .iter()
            .map(|text| {
                KeyPath::parse(text)
                    .with_context(|| format!("invalid key path in diff.ignore: {:?}", text))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DiffOptions::ignoring(paths))
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            workers: self.fetch.workers,
        }
    }

    pub fn fetcher(&self) -> Box<dyn Fetcher> {
        match &self.fetch.source_dir {
            Some(dir) => Box::new(DirectoryFetcher::new(dir)),
            None => Box::new(CommandFetcher::new(
                CommandSpec {
                    program: self.fetch.program.clone(),
                    list_args: self.fetch.list_args.clone(),
                    get_args: self.fetch.get_args.clone(),
                },
                RetryPolicy {
                    retries: self.fetch.retries,
                    backoff: Duration::from_millis(self.fetch.retry_backoff_ms),
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fetch.workers, 4);
        assert_eq!(config.fetch.retries, 2);
        assert_eq!(config.fetch.retry_backoff_ms, 500);
        assert_eq!(config.fetch.program, "kubectl");
        assert_eq!(
            config.diff_options().unwrap().ignore.len(),
            DEFAULT_IGNORE.len()
        );
    }

    #[test]
    fn test_empty_ignore_list_compares_everything() {
        let config = Config::parse("[diff]\nignore = []").unwrap();
        assert!(config.diff_options().unwrap().ignore.is_empty());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::parse(
            r#"
            root = "/var/lib/cmsnap"

            [fetch]
            workers = 8

            [diff]
            ignore = ["metadata.resourceVersion", "metadata.managedFields"]
            "#,
        )
        .unwrap();

        assert_eq!(config.root, PathBuf::from("/var/lib/cmsnap"));
        assert_eq!(config.out, PathBuf::from("reports"));
        assert_eq!(config.fetch.workers, 8);
        assert_eq!(config.fetch.retries, 2);
        assert_eq!(config.diff_options().unwrap().ignore.len(), 2);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::parse("colour = true").is_err());
        assert!(Config::parse("[fetch]\nthreads = 2").is_err());
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let err = Config::parse("[fetch]\nworkers = 0").unwrap_err();
        assert!(format!("{:#}", err).contains("workers"));
    }

    #[test]
    fn test_bad_ignore_path_is_rejected() {
        assert!(Config::parse("[diff]\nignore = [\"a..b\"]").is_err());
    }

    #[test]
    fn test_empty_ignore_path_is_rejected() {
        let err = Config::parse("[diff]\nignore = [\"\"]").unwrap_err();
        assert!(format!("{:#}", err).contains("diff.ignore"));
    }
}
