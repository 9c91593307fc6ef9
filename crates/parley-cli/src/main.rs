//! Parley content negotiation CLI
//!
//! Runs HTTP Accept header negotiation from the command line, which is handy
//! for checking what a server configuration will answer for a given client.
//!
//! Usage:
//!   parley --accept "text/html,application/json;q=0.9" --supported application/json,text/html
//!   parley --config negotiation.yaml --accept "*/*" --output json
//!   parley --supported application/json            # no Accept header at all

use anyhow::Context;
use clap::Parser;
use parley_negotiation::{
    parse_header_with, sort_entries, NegotiationConfig, NegotiationError, Negotiator,
    PreferenceEntry, QualityParsing,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

// Exit status when the config file cannot be read or parsed, or the report
// cannot be written. Negotiation outcomes use 0-3, see `exit_status`.
const EXIT_USAGE_ERROR: u8 = 4;

/// Parley content negotiation
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(
    author,
    version,
    about = "Select the best representation for an HTTP Accept header"
)]
struct Args {
    /// Accept header value. Omit to negotiate as if no header was sent
    #[arg(short, long)]
    accept: Option<String>,

    /// Supported media types, in server preference order
    #[arg(
        short,
        long = "supported",
        value_delimiter = ',',
        env = "PARLEY_SUPPORTED"
    )]
    supported: Vec<String>,

    /// YAML or JSON negotiation config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Charset appended to the Content-Type
    #[arg(long)]
    charset: Option<String>,

    /// Reject malformed quality values instead of coercing them
    #[arg(long)]
    strict: bool,

    /// Output format: text (default), json
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Print the ranked Accept preferences
    #[arg(short, long)]
    explain: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// JSON report for a single negotiation.
#[derive(Debug, Serialize)]
struct Report<'a> {
    accept: Option<&'a str>,
    supported: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    ranked: Option<Vec<PreferenceEntry>>,
    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Outcome {
    Negotiated {
        media_type: String,
        quality: f64,
        content_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<parley_negotiation::Parameters>,
    },
    Failed {
        code: u16,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback_content_type: Option<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{RED}{BOLD}error:{RESET} {e:#}");
            ExitCode::from(EXIT_USAGE_ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let config = build_config(args)?;
    if let Err(e) = config.validate() {
        tracing::warn!("Negotiation config is not valid: {e}");
    }

    let accept = args.accept.as_deref();
    let ranked = match (args.explain, accept) {
        (true, Some(header)) => parse_header_with(header, config.quality_parsing)
            .ok()
            .map(|entries| sort_entries(&entries)),
        _ => None,
    };

    let negotiator = Negotiator::new(config);
    let (outcome, exit_code) = match negotiator.negotiate(accept) {
        Ok(negotiated) => (
            Outcome::Negotiated {
                media_type: negotiated.media_type().to_string(),
                quality: negotiated.quality(),
                content_type: negotiated.content_type.clone(),
                parameters: negotiated.best.parameters,
            },
            ExitCode::SUCCESS,
        ),
        Err(e) => {
            let fallback_content_type = match e {
                NegotiationError::NotAcceptable { .. } => negotiator.error_content_type(),
                _ => None,
            };
            let outcome = Outcome::Failed {
                code: e.status_code(),
                error: e.to_string(),
                fallback_content_type,
            };
            (outcome, ExitCode::from(exit_status(&e)))
        }
    };

    let report = Report {
        accept,
        supported: &negotiator.config().supported,
        ranked,
        outcome,
    };

    if args.output == "json" {
        let output =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{output}");
    } else {
        print_report(&report);
    }

    Ok(exit_code)
}

/// Merge the config file with command-line flags. Flags win.
fn build_config(args: &Args) -> anyhow::Result<NegotiationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading negotiation config from {}", path.display());
            NegotiationConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => NegotiationConfig::default(),
    };

    if !args.supported.is_empty() {
        config.supported = args
            .supported
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(charset) = &args.charset {
        config.charset = Some(charset.clone());
    }
    if args.strict {
        config.quality_parsing = QualityParsing::Strict;
    }

    Ok(config)
}

fn exit_status(error: &NegotiationError) -> u8 {
    match error {
        NegotiationError::NotAcceptable { .. } => 1,
        NegotiationError::NoRepresentations => 2,
        NegotiationError::MalformedQuality { .. } => 3,
    }
}

fn print_report(report: &Report) {
    let accept = report.accept.unwrap_or("(no Accept header)");
    println!("{DIM}Accept:{RESET}    {CYAN}{accept}{RESET}");
    println!(
        "{DIM}Supported:{RESET} {}",
        if report.supported.is_empty() {
            format!("{YELLOW}(none){RESET}")
        } else {
            report.supported.join(", ")
        }
    );

    if let Some(ranked) = &report.ranked {
        println!("\n{BOLD}Ranked preferences{RESET}");
        for (rank, entry) in ranked.iter().enumerate() {
            let params = entry
                .parameters
                .as_ref()
                .map(|p| {
                    let pairs: Vec<String> = p.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    format!(" {DIM}[{}]{RESET}", pairs.join(", "))
                })
                .unwrap_or_default();
            println!(
                "  {DIM}{:>2}.{RESET} {BOLD}{}{RESET} q={}{params} {DIM}(#{}){RESET}",
                rank + 1,
                display_range(&entry.value),
                entry.quality,
                entry.index
            );
        }
    }

    println!();
    match &report.outcome {
        Outcome::Negotiated {
            media_type,
            quality,
            content_type,
            parameters,
        } => {
            println!("{GREEN}{BOLD}Selected:{RESET} {BOLD}{media_type}{RESET} {DIM}(q={quality}){RESET}");
            println!("{DIM}Content-Type:{RESET} {content_type}");
            if let Some(parameters) = parameters {
                for (name, value) in parameters {
                    println!("{DIM}Parameter:{RESET} {name}={value}");
                }
            }
        }
        Outcome::Failed {
            code,
            error,
            fallback_content_type,
        } => {
            println!("{RED}{BOLD}{code}:{RESET} {error}");
            if let Some(content_type) = fallback_content_type {
                println!("{DIM}Error body Content-Type:{RESET} {content_type}");
            }
        }
    }
}

fn display_range(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("parley").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_supported_flag_splits_on_commas() {
        let args = parse(&["--supported", "application/json, text/html", "-s", "text/plain"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.supported, vec!["application/json", "text/html", "text/plain"]);
        assert_eq!(config.quality_parsing, QualityParsing::Lenient);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "supported: [text/json]\ncharset: latin1").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = parse(&["--config", &path, "--charset", "utf-8", "--strict"]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.supported, vec!["text/json"]);
        assert_eq!(config.charset.as_deref(), Some("utf-8"));
        assert_eq!(config.quality_parsing, QualityParsing::Strict);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = parse(&["--config", "/nonexistent/parley.yaml"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_accept_is_optional() {
        let args = parse(&["-s", "application/json"]);
        assert!(args.accept.is_none());
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(
            exit_status(&NegotiationError::NotAcceptable { supported: vec![] }),
            1
        );
        assert_eq!(exit_status(&NegotiationError::NoRepresentations), 2);
        assert_eq!(
            exit_status(&NegotiationError::MalformedQuality {
                index: 0,
                value: "x".into()
            }),
            3
        );
    }

    #[test]
    fn test_config_failure_exit_status_is_distinct() {
        let errors = [
            NegotiationError::NotAcceptable { supported: vec![] },
            NegotiationError::NoRepresentations,
            NegotiationError::MalformedQuality {
                index: 0,
                value: "x".into(),
            },
        ];
        assert!(errors.iter().all(|e| exit_status(e) != EXIT_USAGE_ERROR));
    }

    #[test]
    fn test_report_json_shape() {
        let supported = vec!["application/json".to_string()];
        let report = Report {
            accept: Some("application/xml"),
            supported: &supported,
            ranked: None,
            outcome: Outcome::Failed {
                code: 406,
                error: "not acceptable".into(),
                fallback_content_type: Some("application/json".into()),
            },
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "accept": "application/xml",
                "supported": ["application/json"],
                "status": "failed",
                "code": 406,
                "error": "not acceptable",
                "fallback_content_type": "application/json"
            })
        );
    }
}
