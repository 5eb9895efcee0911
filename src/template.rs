use crate::config::ConfigError;
use crate::frequency;
use itertools::Itertools;
use regex::Regex;

/// The dynamic-token marker together with its run-collapsing pattern.
#[derive(Debug, Clone)]
pub struct Wildcard {
    marker: String,
    runs: Regex,
}

impl Wildcard {
    pub fn new(marker: &str) -> Result<Self, ConfigError> {
        if marker.is_empty() {
            return Err(ConfigError::EmptyWildcard);
        }
        let escaped = regex::escape(marker);
        let pattern = format!(r"{escaped}(\s+{escaped})+");
        let runs = Regex::new(&pattern)
            .map_err(|source| ConfigError::InvalidPattern { pattern, source })?;
        Ok(Self {
            marker: marker.to_string(),
            runs,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.marker
    }

    /// Collapses whitespace-separated runs of the marker into one and trims.
    /// Idempotent.
    pub fn normalize(&self, template: &str) -> String {
        self.runs
            .replace_all(template, regex::NoExpand(self.marker.as_str()))
            .trim()
            .to_string()
    }

    /// Post-synthesis cleanup: optional number wildcarding, then
    /// [`normalize`](Self::normalize).
    pub fn cleanup(&self, template: &str, replace_numbers: bool) -> String {
        if replace_numbers {
            self.normalize(&replace_standalone_numbers(template, &self.marker))
        } else {
            self.normalize(template)
        }
    }
}

/// Builds one template per group from its members' token strings.
#[derive(Debug, Clone)]
pub struct TemplateSynthesizer {
    wildcard: Wildcard,
    sample_size: usize,
    replace_numbers: bool,
}

impl TemplateSynthesizer {
    pub fn new(wildcard: Wildcard, sample_size: usize, replace_numbers: bool) -> Self {
        Self {
            wildcard,
            sample_size,
            replace_numbers,
        }
    }

    pub fn wildcard(&self) -> &Wildcard {
        &self.wildcard
    }

    /// Template for a group given its members' token strings in input order.
    ///
    /// The first member is the skeleton; each of its tokens that is absent
    /// from some sampled member becomes the wildcard. A lone member is its
    /// own template.
    pub fn synthesize(&self, token_strings: &[&str]) -> String {
        let Some(first) = token_strings.first() else {
            return String::new();
        };
        if token_strings.len() == 1 {
            return self.wildcard.cleanup(first, self.replace_numbers);
        }

        let sampled = frequency::sample(token_strings, self.sample_size);
        let vocab = frequency::vocabulary(sampled.iter().map(|s| **s));
        let dynamic = frequency::dynamic_tokens(&vocab, sampled.len());

        let skeleton = first
            .split_whitespace()
            .map(|tok| {
                if dynamic.contains(tok) {
                    self.wildcard.as_str()
                } else {
                    tok
                }
            })
            .join(" ");

        self.wildcard.cleanup(&skeleton, self.replace_numbers)
    }
}

/// Replaces every numeric token with `wildcard`; tokens are re-joined with single spaces.
pub fn replace_standalone_numbers(s: &str, wildcard: &str) -> String {
    s.split_whitespace()
        .map(|tok| if is_numeric_token(tok) { wildcard } else { tok })
        .join(" ")
}

/// Digits, dots and underscores with an optional leading minus, at least one digit.
pub fn is_numeric_token(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    !body.is_empty()
        && body.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'_')
        && body.bytes().any(|b| b.is_ascii_digit())
}
