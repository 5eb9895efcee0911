use anyhow::Context;
use clap::Parser as _;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ulp::output::{self, OutputFormat};
use ulp::{Parser, ParserConfig};

#[derive(clap::Parser, Debug)]
#[command(
    name = "ulp",
    version,
    about = "Extracts log templates from unstructured log files",
    after_help = "If no INPUT is given, reads from stdin."
)]
struct Cli {
    /// Input file (`-` for stdin)
    input: Option<String>,

    /// JSON parser config; flags below override it
    #[arg(long = "config")]
    config: Option<String>,

    /// Log header format, e.g. "<Date> <Time> <Level> <Content>"
    #[arg(long = "header-format")]
    header_format: Option<String>,

    /// Header field holding the log message
    #[arg(long = "content-field")]
    content_field: Option<String>,

    /// Extra regex patterns rewritten to the wildcard, comma-separated
    #[arg(long = "regex", value_delimiter = ',')]
    regex: Vec<String>,

    /// Max events sampled per group, 0 = all
    #[arg(long = "sample-size", allow_negative_numbers = true)]
    sample_size: Option<i64>,

    /// Worker threads, 0 = one per CPU
    #[arg(long = "workers", allow_negative_numbers = true)]
    workers: Option<i64>,

    /// Placeholder for dynamic tokens
    #[arg(long = "wildcard")]
    wildcard: Option<String>,

    /// Also wildcard standalone numbers in templates
    #[arg(long = "replace-numbers", default_value_t = false)]
    replace_numbers: bool,

    /// Output format: csv | json | text
    #[arg(long = "format", default_value = "csv")]
    format: String,

    /// Output only unique templates
    #[arg(long = "templates-only", default_value_t = false)]
    templates_only: bool,

    /// Output file (default stdout)
    #[arg(long = "output", short = 'o')]
    output: Option<String>,

    /// Print parsing statistics to stderr
    #[arg(long = "verbose", short = 'v', default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn parser_config(&self) -> anyhow::Result<ParserConfig> {
        let mut config = match &self.config {
            Some(path) => ParserConfig::from_json_file(path)
                .with_context(|| format!("loading config {path}"))?,
            None => ParserConfig::default(),
        };
        if let Some(format) = &self.header_format {
            config = config.with_header_format(format.clone());
        }
        if let Some(field) = &self.content_field {
            config = config.with_content_field(field.clone());
        }
        let patterns = self
            .regex
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        config = config.with_custom_patterns(patterns);
        if let Some(n) = self.sample_size {
            config = config.with_sample_size(n);
        }
        if let Some(n) = self.workers {
            config = config.with_workers(n);
        }
        if let Some(w) = &self.wildcard {
            config = config.with_wildcard(w.clone());
        }
        if self.replace_numbers {
            config = config.with_replace_numbers(true);
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "ulp=info" } else { "ulp=warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let config = cli.parser_config()?;
    let parser = Parser::new(&config).context("creating parser")?;
    ulp::masking::prewarm_regexes();

    let result = match cli.input.as_deref() {
        Some(path) if path != "-" => {
            let f = File::open(path).with_context(|| format!("opening input file {path}"))?;
            parser.parse(BufReader::with_capacity(1 << 20, f))
        }
        _ => {
            if atty::is(atty::Stream::Stdin) {
                warn!("reading log lines from the terminal; end input with Ctrl-D");
            }
            parser.parse(io::stdin().lock())
        }
    }
    .context("parsing input")?;

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output file {path}"))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let written = if cli.templates_only {
        let templates = output::sorted_by_count(&result.templates);
        output::write_templates(out, &templates, format)
    } else {
        output::write_events(out, &result, format)
    };
    written.context("writing output")?;

    info!(
        lines = result.events.len(),
        templates = result.templates.len(),
        groups = result.groups.len(),
        duration = ?result.duration,
        "parse complete"
    );
    if cli.verbose {
        eprintln!("Lines:     {}", result.events.len());
        eprintln!("Templates: {}", result.templates.len());
        eprintln!("Groups:    {}", result.groups.len());
        eprintln!("Duration:  {:?}", result.duration);
    }
    Ok(())
}
