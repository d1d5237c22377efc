//! # tokens CLI entry point
//!
//! Parses arguments, configures logging from `-v`, assembles the pipeline
//! configuration, and maps the run to an exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tokens_cli::{run, Mode, Overrides, PipelineConfig, EXIT_FATAL};

/// Design-token pipeline.
///
/// Validates the token source against its constraint document, resolves
/// references, enforces layer direction, and emits CSS custom properties,
/// a typed TypeScript module and platform JSON.
#[derive(Parser, Debug)]
#[command(name = "tokens", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Pipeline configuration file. Defaults to `tokens.config.yaml` in the
    /// working directory when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token source document, overriding the configuration.
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Constraint document, overriding the configuration.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Output directory for generated artifacts, overriding the configuration.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Run every check but write no files.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> ExitCode {
    // clap's own exit status for usage errors is 2, which would read as a
    // validation failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_FATAL)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match execute(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn execute(cli: Cli) -> Result<u8> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let mut config = PipelineConfig::discover(cli.config.as_deref(), &cwd)?;
    config.apply(Overrides {
        tokens: cli.tokens,
        schema: cli.schema,
        out_dir: cli.out_dir,
    });

    let mode = if cli.validate_only {
        Mode::ValidateOnly
    } else {
        Mode::Build
    };
    tracing::debug!(?mode, tokens = %config.tokens.display(), "starting pipeline");

    let outcome = run(&config, mode)?;
    if !outcome.report.is_clean() {
        eprint!("{}", outcome.report);
        eprintln!("{} problem(s) found; no files written", outcome.report.len());
    } else if mode == Mode::ValidateOnly {
        println!("{} tokens valid", outcome.tokens);
    } else {
        println!(
            "wrote {} artifacts for {} tokens to {}",
            outcome.written.len(),
            outcome.tokens,
            config.out_dir.display()
        );
    }
    Ok(outcome.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_defaults() {
        let cli = Cli::try_parse_from(["tokens"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        assert!(cli.tokens.is_none());
        assert!(!cli.validate_only);
    }

    #[test]
    fn cli_parse_validate_only() {
        let cli = Cli::try_parse_from(["tokens", "--validate-only"]).unwrap();
        assert!(cli.validate_only);
    }

    #[test]
    fn cli_parse_paths() {
        let cli = Cli::try_parse_from([
            "tokens",
            "--config",
            "design/tokens.config.yaml",
            "--tokens",
            "t.json",
            "--schema",
            "s.json",
            "--out-dir",
            "build",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("design/tokens.config.yaml")));
        assert_eq!(cli.tokens, Some(PathBuf::from("t.json")));
        assert_eq!(cli.schema, Some(PathBuf::from("s.json")));
        assert_eq!(cli.out_dir, Some(PathBuf::from("build")));
    }

    #[test]
    fn cli_parse_verbosity_counts() {
        let cli = Cli::try_parse_from(["tokens", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn cli_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["tokens", "extra"]).is_err());
    }
}
