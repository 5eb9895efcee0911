pub mod config;
pub mod header;
pub mod masking;
pub mod signature;
pub mod grouper;
pub mod frequency;
pub mod template;
pub mod merge;
pub mod scheduler;
pub mod parser;
pub mod output;

pub use config::{ConfigError, ParserConfig};
pub use merge::Template;
pub use parser::{Event, ParseError, ParseResult, Parser};
