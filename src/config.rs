use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONTENT_FIELD: &str = "Content";
pub const DEFAULT_WILDCARD: &str = "<*>";
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;
pub const DEFAULT_NORMALIZE_CACHE_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("header format cannot be empty")]
    EmptyHeaderFormat,
    #[error("unclosed field marker in header format: {0}")]
    UnclosedFieldMarker(String),
    #[error("no fields found in header format: {0}")]
    NoHeaderFields(String),
    #[error("content field cannot be empty")]
    EmptyContentField,
    #[error("dynamic wildcard cannot be empty")]
    EmptyWildcard,
    #[error("sample size cannot be negative: {0}")]
    NegativeSampleSize(i64),
    #[error("max line length must be positive")]
    ZeroLineLimit,
    #[error("invalid regex pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parser settings as supplied by the caller (CLI flags or a JSON file).
///
/// Nothing here is checked until [`ParserConfig::validate`] runs, which
/// `Parser::new` always does before touching any input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Header layout such as `"<Date> <Time> <Level> <Content>"`. `None` means
    /// the whole line is the message body.
    pub header_format: Option<String>,
    /// Header field holding the message body.
    pub content_field: String,
    /// Extra patterns whose matches are rewritten to the wildcard, in order.
    pub custom_patterns: Vec<String>,
    /// Events sampled per group for frequency analysis, 0 = all.
    pub sample_size: i64,
    /// Worker threads for template synthesis, 0 or negative = host parallelism.
    pub workers: i64,
    pub wildcard: String,
    /// Wildcard standalone numbers in templates.
    pub replace_numbers: bool,
    pub max_line_bytes: usize,
    /// Per-run memo of normalized bodies, 0 disables it.
    pub normalize_cache_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            header_format: None,
            content_field: DEFAULT_CONTENT_FIELD.to_string(),
            custom_patterns: Vec::new(),
            sample_size: 0,
            workers: 0,
            wildcard: DEFAULT_WILDCARD.to_string(),
            replace_numbers: false,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            normalize_cache_size: DEFAULT_NORMALIZE_CACHE_SIZE,
        }
    }
}

impl ParserConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_header_format(mut self, format: impl Into<String>) -> Self {
        self.header_format = Some(format.into());
        self
    }

    pub fn with_content_field(mut self, field: impl Into<String>) -> Self {
        self.content_field = field.into();
        self
    }

    pub fn with_custom_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_sample_size(mut self, n: i64) -> Self {
        self.sample_size = n;
        self
    }

    pub fn with_workers(mut self, n: i64) -> Self {
        self.workers = n;
        self
    }

    pub fn with_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard = wildcard.into();
        self
    }

    pub fn with_replace_numbers(mut self, enable: bool) -> Self {
        self.replace_numbers = enable;
        self
    }

    pub fn with_max_line_bytes(mut self, limit: usize) -> Self {
        self.max_line_bytes = limit;
        self
    }

    pub fn with_normalize_cache_size(mut self, size: usize) -> Self {
        self.normalize_cache_size = size;
        self
    }

    /// Checks the scalar settings. Header layout and regex syntax are checked
    /// when they are compiled by `Parser::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_field.is_empty() {
            return Err(ConfigError::EmptyContentField);
        }
        if self.wildcard.is_empty() {
            return Err(ConfigError::EmptyWildcard);
        }
        if self.sample_size < 0 {
            return Err(ConfigError::NegativeSampleSize(self.sample_size));
        }
        if self.max_line_bytes == 0 {
            return Err(ConfigError::ZeroLineLimit);
        }
        if matches!(self.header_format.as_deref(), Some("")) {
            return Err(ConfigError::EmptyHeaderFormat);
        }
        Ok(())
    }

    /// Sample size with the "0 = no sampling" convention, after validation.
    pub fn effective_sample_size(&self) -> usize {
        usize::try_from(self.sample_size).unwrap_or(0)
    }

    /// Configured worker count, falling back to the number of CPUs.
    pub fn effective_workers(&self) -> usize {
        match usize::try_from(self.workers) {
            Ok(n) if n > 0 => n,
            _ => num_cpus::get(),
        }
    }
}
