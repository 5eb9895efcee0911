use crate::config::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters dropped before any pattern runs.
pub const PUNCTUATION_TO_REMOVE: &str = "!@#$%^&{}<>?\\|`~";

static RE_MAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9a-fA-F]{2}:){5}[0-9a-fA-F]{2}").unwrap()
});

static RE_DATE_DASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").unwrap()
});

static RE_DATE_SLASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{4}/[0-9]{2}/[0-9]{2}").unwrap()
});

static RE_TIME: Lazy<Regex> = Lazy::new(|| {
    // HH:MM:SS with optional .mmm or ,mmm
    Regex::new(r"[0-9]{2}:[0-9]{2}:[0-9]{2}(?:[.,][0-9]{3})?").unwrap()
});

static RE_HEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"0[xX][0-9a-fA-F]+").unwrap()
});

static RE_IPV6: Lazy<Regex> = Lazy::new(|| {
    // Loose: any run of 8+ colon-terminated hex groups
    Regex::new(r"([0-9a-fA-F]*:){8,}").unwrap()
});

static RE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://\S+").unwrap()
});

static RE_HOST: Lazy<Regex> = Lazy::new(|| {
    // Dotted host/domain names and IPv4 addresses, optionally with a leading slash
    Regex::new(r"(/?)([a-zA-Z0-9-]+\.){2,}([a-zA-Z0-9-]+)?").unwrap()
});

static RE_BRACKET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([=()\[\]])").unwrap()
});

/// Built-in rules, most specific first.
static DEFAULT_PATTERNS: [&Lazy<Regex>; 8] = [
    &RE_MAC,
    &RE_DATE_DASH,
    &RE_DATE_SLASH,
    &RE_TIME,
    &RE_HEX,
    &RE_IPV6,
    &RE_URL,
    &RE_HOST,
];

/// Rewrites a message body into its token string.
#[derive(Debug, Clone)]
pub struct Normalizer {
    wildcard: String,
    custom: Vec<Regex>,
}

impl Normalizer {
    /// Compiles the user patterns once; they run after the built-in ones.
    pub fn new(wildcard: &str, custom_patterns: &[String]) -> Result<Self, ConfigError> {
        let custom = custom_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            wildcard: wildcard.to_string(),
            custom,
        })
    }

    pub fn wildcard(&self) -> &str {
        &self.wildcard
    }

    pub fn normalize(&self, body: &str) -> String {
        let s = remove_punctuation(body);
        let s = self.replace_dynamic(s);
        let s = RE_BRACKET.replace_all(&s, " ${1} ");
        collapse_spaces(&s).trim().to_string()
    }

    fn replace_dynamic(&self, mut s: String) -> String {
        for re in DEFAULT_PATTERNS.iter() {
            s = self.replace_matches(re, s);
        }
        for re in &self.custom {
            s = self.replace_matches(re, s);
        }
        s
    }

    fn replace_matches(&self, re: &Regex, s: String) -> String {
        // only reallocate when something matched
        if re.is_match(&s) {
            re.replace_all(&s, regex::NoExpand(self.wildcard.as_str())).into_owned()
        } else {
            s
        }
    }
}

pub fn remove_punctuation(s: &str) -> String {
    s.chars().filter(|c| !PUNCTUATION_TO_REMOVE.contains(*c)).collect()
}

/// Squeezes runs of spaces and tabs into one space.
pub fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch == ' ' || ch == '\t' {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out
}

/// Forces compilation of the built-in patterns before worker threads start.
pub fn prewarm_regexes() {
    for re in DEFAULT_PATTERNS.iter() {
        Lazy::force(re);
    }
    Lazy::force(&RE_BRACKET);
}
