use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use htmlstrip_core::{CleanConfig, FetchConfig, FetchOutcome, clean_html, fetch_file, fetch_stdin, fetch_url};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the fetched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, html, json", s)),
        }
    }
}

/// Fetch a web page, follow its redirects and strip it down to plain text
#[derive(Parser, Debug)]
#[command(name = "htmlstrip")]
#[command(version)]
#[command(about = "Fetch web pages and reduce them to plain text", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, html, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Maximum number of redirects to follow (negative values follow none)
    #[arg(long, default_value_t = htmlstrip_core::DEFAULT_REDIRECTS, allow_negative_numbers = true, value_name = "NUM")]
    redirects: i32,

    /// HTTP timeout in seconds, per request and for the whole fetch
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Additional element to remove with its content (repeatable)
    #[arg(long = "remove", value_name = "TAG")]
    remove: Vec<String>,

    /// Leave HTML character references in the output
    #[arg(long)]
    keep_entities: bool,

    /// Trim leading and trailing whitespace from the output
    #[arg(long)]
    trim: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Machine-readable result for `--format json`
#[derive(Debug, Serialize)]
struct Report {
    source: String,
    url: Option<String>,
    redirects: u32,
    text: String,
}

/// Raw markup and where it was finally read from
struct Source {
    html: String,
    url: Option<String>,
    redirects: u32,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,htmlstrip_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

async fn read_source(args: &Args, input: &str) -> anyhow::Result<Source> {
    if input == "-" {
        let html = fetch_stdin().context("Failed to read from stdin")?;
        return Ok(Source { html, url: None, redirects: 0 });
    }

    if !is_url(input) {
        let html = fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?;
        return Ok(Source { html, url: None, redirects: 0 });
    }

    let mut config = FetchConfig { timeout: args.timeout, redirects: args.redirects, ..Default::default() };
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = user_agent.clone();
    }

    tracing::debug!(url = %input, redirects = config.redirects, "starting fetch");
    let outcome = tokio::time::timeout(Duration::from_secs(args.timeout), fetch_url(input, &config))
        .await
        .with_context(|| format!("Timed out after {} seconds fetching {}", args.timeout, input))?
        .context("Failed to fetch URL")?;

    match outcome {
        FetchOutcome::Html(fetched) => Ok(Source { html: fetched.html, url: Some(fetched.url), redirects: fetched.redirects }),
        outcome => bail!("No HTML document at {}: {}", input, outcome),
    }
}

fn clean_config(args: &Args) -> CleanConfig {
    args.remove
        .iter()
        .fold(CleanConfig::builder(), |builder, tag| builder.remove_element(tag))
        .decode_entities(!args.keep_entities)
        .build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "htmlstrip", &mut std::io::stdout());
        return Ok(());
    }

    let Some(input) = args.input.clone() else {
        bail!("An INPUT argument is required");
    };

    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let started = Instant::now();

    if args.verbose {
        let message = match input.as_str() {
            "-" => "Reading from stdin".to_string(),
            input if is_url(input) => format!("Fetching from {}", input.bright_white().underline()),
            input => format!("Reading from file {}", input.bright_white()),
        };
        echo::print_step(1, 3, &message);
    }

    let source = read_source(&args, &input).await?;

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(source.html.len()));
        if let Some(url) = &source.url {
            echo::print_detail("Final URL", url);
            echo::print_detail("Redirects", &source.redirects.to_string());
        }
        echo::print_timing("Read", started.elapsed());
        eprintln!();
    }

    let config = clean_config(&args);

    if args.verbose {
        echo::print_step(2, 3, "Stripping markup");
        echo::print_detail("Stages", &config.stages.len().to_string());
    }

    let cleaning = Instant::now();
    let mut text = match args.format {
        OutputFormat::Html => source.html.clone(),
        OutputFormat::Text | OutputFormat::Json => clean_html(&source.html, &config),
    };
    if args.trim {
        text = text.trim().to_string();
    }

    if args.verbose {
        echo::print_timing("Strip", cleaning.elapsed());
        if text.trim().is_empty() {
            echo::print_warning("Document has no visible text");
        }
        eprintln!();
        echo::print_step(3, 3, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let output = match args.format {
        OutputFormat::Json => {
            let report = Report { source: input, url: source.url, redirects: source.redirects, text };
            serde_json::to_string_pretty(&report).context("Failed to serialize JSON")?
        }
        OutputFormat::Text | OutputFormat::Html => text,
    };

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
