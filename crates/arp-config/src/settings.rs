use anyhow::{bail, Context, Result};
use arp_import::{ImportOptions, MergePolicy, DEFAULT_CHUNK_SIZE};
use serde_json::Value;

/// Import knobs read from `/import/*`. Absent keys fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    pub chunk_size: usize,
    pub strict: bool,
    pub policy: MergePolicy,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            strict: false,
            policy: MergePolicy::Upsert,
        }
    }
}

impl ImportSettings {
    pub fn from_config_json(config: &Value) -> Result<Self> {
        let mut out = Self::default();

        if let Some(v) = config.pointer("/import/chunk_size") {
            let n = v
                .as_u64()
                .context("CONFIG_INVALID /import/chunk_size must be a non-negative integer")?;
            if n == 0 {
                bail!("CONFIG_INVALID /import/chunk_size must be > 0");
            }
            out.chunk_size = usize::try_from(n).context("CONFIG_INVALID /import/chunk_size too large")?;
        }

        if let Some(v) = config.pointer("/import/strict") {
            out.strict = v
                .as_bool()
                .context("CONFIG_INVALID /import/strict must be a boolean")?;
        }

        if let Some(v) = config.pointer("/import/policy") {
            let raw = v
                .as_str()
                .context("CONFIG_INVALID /import/policy must be a string")?;
            out.policy = MergePolicy::parse(raw).with_context(|| {
                format!("CONFIG_INVALID /import/policy '{raw}' (expected UPSERT, INSERT_ONLY or REPLACE_ALL)")
            })?;
        }

        Ok(out)
    }

    pub fn to_options(self) -> ImportOptions {
        ImportOptions {
            chunk_size: self.chunk_size,
            strict: self.strict,
            policy: self.policy,
        }
    }
}

/// Snapshot location read from `/store/path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSettings {
    pub path: Option<String>,
}

impl StoreSettings {
    pub fn from_config_json(config: &Value) -> Result<Self> {
        let path = match config.pointer("/store/path") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_str()
                    .context("CONFIG_INVALID /store/path must be a string")?
                    .to_string(),
            ),
        };
        Ok(Self { path })
    }
}
