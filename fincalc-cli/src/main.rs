use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use fincalc_cli::session::script_tokens;
use fincalc_cli::{Session, config_file, logging};
use fincalc_core::{Calculator, CalculatorConfig};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Keystroke-driven financial calculator.
///
/// Presses the given KEYS (or the tokens in --script) and prints the final
/// display. With neither, reads key tokens from stdin line by line.
#[derive(Debug, Parser)]
#[command(name = "fincalc", version)]
struct Cli {
    /// TOML file with starting registers, bond and depreciation settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `fincalc_core=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print snapshots as JSON.
    #[arg(long)]
    json: bool,

    /// File of whitespace-separated key tokens; `#` starts a comment line.
    #[arg(long, conflicts_with = "keys")]
    script: Option<PathBuf>,

    /// Key tokens to press, e.g. `1 2 n 1 2 iyr`.
    keys: Vec<String>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let config = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            config_file::load_config(path)?
        }
        None => CalculatorConfig::default(),
    };
    let calculator = Calculator::with_config(config).context("invalid configuration")?;
    let mut session = Session::new(calculator, cli.json);

    if let Some(path) = &cli.script {
        let script = fs::read_to_string(path)
            .with_context(|| format!("cannot read script '{}'", path.display()))?;
        session.press_tokens(script_tokens(&script));
        return session.write_snapshot(io::stdout().lock());
    }

    if !cli.keys.is_empty() {
        session.press_tokens(cli.keys.iter().map(String::as_str));
        return session.write_snapshot(io::stdout().lock());
    }

    info!(json = cli.json, "starting interactive session");
    if io::stdin().is_terminal() {
        eprintln!("fincalc: enter key tokens, :help for the key map, :quit to exit");
    }
    session.run_repl(io::stdin().lock(), io::stdout().lock())
}
