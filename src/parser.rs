use crate::config::{ConfigError, ParserConfig};
use crate::grouper::{self, Group};
use crate::header::{self, HeaderLayout};
use crate::masking::Normalizer;
use crate::merge::{self, Template};
use crate::scheduler::{PoolError, WorkerPool};
use crate::signature;
use crate::template::{TemplateSynthesizer, Wildcard};
use ahash::AHashMap;
use lru::LruCache;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line} is longer than {limit} bytes")]
    LineTooLong { line: usize, limit: usize },
    #[error(transparent)]
    WorkerPool(#[from] PoolError),
}

/// One non-blank input line after preprocessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 1-based position among non-blank lines.
    pub line_id: usize,
    /// Message body with the header removed, before normalization.
    pub raw_content: String,
    pub token_string: String,
    pub event_id: String,
    /// Set once, after merging.
    pub template_id: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Input order.
    pub events: Vec<Event>,
    /// Discovery order.
    pub templates: Vec<Template>,
    /// Ordered by first member.
    pub groups: Vec<Group>,
    pub duration: Duration,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn template(&self, template_id: usize) -> Option<&Template> {
        // IDs are dense and 1-based
        template_id
            .checked_sub(1)
            .and_then(|i| self.templates.get(i))
            .filter(|t| t.template_id == template_id)
    }

    pub fn template_of(&self, event: &Event) -> Option<&Template> {
        event.template_id.and_then(|id| self.template(id))
    }
}

/// Unsupervised log parser. Build once, parse any number of inputs.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    header: Option<HeaderLayout>,
    normalizer: Normalizer,
    synthesizer: TemplateSynthesizer,
    workers: usize,
    /// Built on first use and shared by clones.
    pool: Arc<OnceCell<WorkerPool>>,
}

impl Parser {
    /// Validates `config` and compiles the header layout and every pattern.
    pub fn new(config: &ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let header = config
            .header_format
            .as_deref()
            .map(|format| HeaderLayout::parse(format, &config.content_field))
            .transpose()?;
        let normalizer = Normalizer::new(&config.wildcard, &config.custom_patterns)?;
        let wildcard = Wildcard::new(&config.wildcard)?;
        let synthesizer = TemplateSynthesizer::new(
            wildcard,
            config.effective_sample_size(),
            config.replace_numbers,
        );
        Ok(Self {
            config: config.clone(),
            header,
            normalizer,
            synthesizer,
            workers: config.effective_workers(),
            pool: Arc::new(OnceCell::new()),
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn header_layout(&self) -> Option<&HeaderLayout> {
        self.header.as_ref()
    }

    pub fn wildcard(&self) -> &str {
        self.synthesizer.wildcard().as_str()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Message body of a raw line.
    pub fn extract_content<'a>(&self, line: &'a str) -> &'a str {
        header::extract_content(self.header.as_ref(), line)
    }

    /// Token string of a message body.
    pub fn preprocess(&self, content: &str) -> String {
        self.normalizer.normalize(content)
    }

    /// Reads every line from `reader`, then mines templates.
    ///
    /// Any read failure or over-long line aborts the whole parse.
    pub fn parse<R: BufRead>(&self, mut reader: R) -> Result<ParseResult, ParseError> {
        let start = Instant::now();
        let limit = self.config.max_line_bytes;
        let mut builder = EventBuilder::new(self);
        let mut buf: Vec<u8> = Vec::with_capacity(256);
        let mut physical = 0usize;

        loop {
            buf.clear();
            // room for the line plus "\r\n"
            let n = reader
                .by_ref()
                .take((limit as u64).saturating_add(2))
                .read_until(b'\n', &mut buf)?;
            if n == 0 {
                break;
            }
            physical += 1;
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
            if buf.len() > limit {
                return Err(ParseError::LineTooLong { line: physical, limit });
            }
            builder.push(&String::from_utf8_lossy(&buf));
        }

        self.finish(builder.events, start)
    }

    /// Same pipeline over lines already in memory.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = Instant::now();
        let limit = self.config.max_line_bytes;
        let mut builder = EventBuilder::new(self);
        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.len() > limit {
                return Err(ParseError::LineTooLong { line: i + 1, limit });
            }
            builder.push(line);
        }
        self.finish(builder.events, start)
    }

    fn finish(&self, mut events: Vec<Event>, start: Instant) -> Result<ParseResult, ParseError> {
        debug!(events = events.len(), elapsed = ?start.elapsed(), "preprocessed input");
        if events.is_empty() {
            return Ok(ParseResult {
                events,
                templates: Vec::new(),
                groups: Vec::new(),
                duration: start.elapsed(),
            });
        }

        let stage = Instant::now();
        let groups = grouper::group_events(&events);
        debug!(groups = groups.len(), elapsed = ?stage.elapsed(), "grouped events");

        let stage = Instant::now();
        let pool = self.pool.get_or_try_init(|| WorkerPool::new(self.workers))?;
        pool.for_each(&groups, |group| {
            let tokens = group.token_strings(&events);
            let template = self.synthesizer.synthesize(&tokens);
            trace!(event_id = %group.event_id, members = group.len(), %template, "synthesized template");
            if let Err(rejected) = group.set_template(template) {
                warn!(event_id = %group.event_id, %rejected, "group template already set, keeping the first");
            }
        });
        debug!(workers = pool.threads(), elapsed = ?stage.elapsed(), "synthesized templates");

        let stage = Instant::now();
        let templates = merge::merge_groups(&groups, self.synthesizer.wildcard());
        debug!(templates = templates.len(), elapsed = ?stage.elapsed(), "merged templates");

        let template_by_event_id: AHashMap<&str, usize> = templates
            .iter()
            .flat_map(|t| t.event_ids.iter().map(move |eid| (eid.as_str(), t.template_id)))
            .collect();
        for ev in events.iter_mut() {
            ev.template_id = template_by_event_id.get(ev.event_id.as_str()).copied();
        }

        Ok(ParseResult {
            events,
            templates,
            groups,
            duration: start.elapsed(),
        })
    }
}

/// Turns raw lines into events, memoising normalization of repeated bodies.
struct EventBuilder<'p> {
    parser: &'p Parser,
    cache: Option<LruCache<String, (String, String)>>,
    events: Vec<Event>,
}

impl<'p> EventBuilder<'p> {
    fn new(parser: &'p Parser) -> Self {
        let cache = NonZeroUsize::new(parser.config.normalize_cache_size).map(LruCache::new);
        Self {
            parser,
            cache,
            events: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let content = self.parser.extract_content(line);
        let (token_string, event_id) = self.tokenize(content);
        self.events.push(Event {
            line_id: self.events.len() + 1,
            raw_content: content.to_string(),
            token_string,
            event_id,
            template_id: None,
        });
    }

    fn tokenize(&mut self, content: &str) -> (String, String) {
        if let Some(hit) = self.cache.as_mut().and_then(|c| c.get(content)) {
            return hit.clone();
        }
        let token_string = self.parser.preprocess(content);
        let event_id = signature::event_id(&token_string);
        if let Some(cache) = self.cache.as_mut() {
            cache.put(content.to_string(), (token_string.clone(), event_id.clone()));
        }
        (token_string, event_id)
    }
}
