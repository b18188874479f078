use std::collections::BTreeMap;
use std::path::PathBuf;

use pdf_table_csv::{ContinuationRule, DEFAULT_SCRATCH_DIR};
use worker::Env;

use crate::error::WorkerError;

pub const DEFAULT_R2_BINDING: &str = "BUCKET";

/// Worker settings read from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub scratch_dir: PathBuf,
    /// Binding used for buckets not listed in `bucket_bindings`.
    pub default_binding: String,
    /// Bucket name to R2 binding name.
    pub bucket_bindings: BTreeMap<String, String>,
    pub continuation: ContinuationRule,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            default_binding: DEFAULT_R2_BINDING.to_string(),
            bucket_bindings: BTreeMap::new(),
            continuation: ContinuationRule::default(),
        }
    }
}

impl WorkerConfig {
    pub fn from_env(env: &Env) -> Result<Self, WorkerError> {
        Self::from_lookup(|name| env.var(name).ok().map(|value| value.to_string()))
    }

    /// Builds the config from any variable source; unset variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WorkerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("SCRATCH_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.scratch_dir = PathBuf::from(dir.trim());
        }
        if let Some(binding) = lookup("R2_BINDING").filter(|binding| !binding.trim().is_empty()) {
            config.default_binding = binding.trim().to_string();
        }
        if let Some(raw) = lookup("BUCKET_BINDINGS") {
            config.bucket_bindings = serde_json::from_str(&raw).map_err(|error| {
                WorkerError::Config(format!("BUCKET_BINDINGS must be a JSON object: {error}"))
            })?;
        }
        if let Some(skip) = parse_count(&lookup, "FIRST_REGION_SKIP")? {
            config.continuation.first_region_skip = skip;
        }
        if let Some(skip) = parse_count(&lookup, "CONTINUATION_SKIP")? {
            config.continuation.continuation_skip = skip;
        }

        Ok(config)
    }

    pub fn binding_for(&self, bucket: &str) -> &str {
        self.bucket_bindings
            .get(bucket)
            .map_or(self.default_binding.as_str(), String::as_str)
    }
}

fn parse_count<F>(lookup: &F, name: &str) -> Result<Option<usize>, WorkerError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse::<usize>().map_err(|error| {
                WorkerError::Config(format!("{name} must be a non-negative integer: {error}"))
            })
        })
        .transpose()
}
