use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fiscal_core::Regime;
use fiscal_core::calculations::AnnualInputs;
use rust_decimal::Decimal;
use tracing::{debug, info};

use fiscal_cli::utils::{parse_amount, parse_regime};
use fiscal_cli::{AppConfig, app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Monthly fiscal estimator: ISR, IVA, payroll tax and withholdings.
///
/// Every command runs as a logged-in user; that user is printed on reports
/// as the author.
#[derive(Debug, Parser)]
#[command(name = "fiscal", version, about)]
struct Cli {
    /// Path to the TOML config file. A missing file means defaults.
    #[arg(long, default_value = "fiscal.toml")]
    config: PathBuf,

    /// User name to log in as.
    #[arg(short, long)]
    user: String,

    /// Password for the user.
    #[arg(short, long)]
    password: Option<String>,

    /// Log level or EnvFilter directive. Overrides RUST_LOG and the config.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the text report for every row of an inputs CSV.
    Calculate {
        #[arg(short, long)]
        inputs: PathBuf,

        /// Force every row onto this regime (GENERAL, RESICO, PF).
        #[arg(long, value_parser = parse_regime)]
        regime: Option<Regime>,
    },

    /// Write one PDF report per row of an inputs CSV.
    Report {
        #[arg(short, long)]
        inputs: PathBuf,

        /// Directory the PDFs are written to.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Free-form notes appended to every report.
        #[arg(long, default_value = "")]
        notes: String,

        #[arg(long, value_parser = parse_regime)]
        regime: Option<Regime>,
    },

    /// Year-end ISR estimate at the corporate rate.
    Annual {
        #[arg(long, value_parser = parse_amount)]
        income: Decimal,

        #[arg(long, value_parser = parse_amount)]
        deductions: Decimal,

        #[arg(long, value_parser = parse_amount, default_value = "0")]
        provisional_payments: Decimal,
    },

    /// Show the configured bracket table.
    Brackets {
        /// Also compute the bracket ISR for this taxable base.
        #[arg(long, value_parser = parse_amount)]
        base: Option<Decimal>,

        /// Fail on the first malformed table line instead of skipping it.
        #[arg(long)]
        strict: bool,
    },

    /// Replace the company logo printed on PDF reports.
    SetLogo { image: PathBuf },
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    if cli.log_level.is_none() && std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(&config.logging.level)?;
    }
    if let Some(file) = &config.logging.file {
        logging::enable_file_logging(file)?;
    }

    let mut session = app::login(&config, &cli.user, cli.password.as_deref())?;
    debug!(command = ?cli.command, "running command");

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Calculate { inputs, regime } => {
            let inputs = app::load_inputs(&inputs, regime)?;
            app::calculate(&mut session, &config, inputs, &mut stdout)?;
        }
        Command::Report {
            inputs,
            output,
            notes,
            regime,
        } => {
            let inputs = app::load_inputs(&inputs, regime)?;
            let today = chrono::Local::now().date_naive();
            let written =
                app::write_reports(&mut session, &config, inputs, &output, &notes, today)?;
            for path in written {
                writeln!(stdout, "{}", path.display())?;
            }
        }
        Command::Annual {
            income,
            deductions,
            provisional_payments,
        } => {
            let inputs = AnnualInputs {
                income,
                deductions,
                provisional_payments,
            };
            app::annual(&config, &inputs, &mut stdout)?;
        }
        Command::Brackets { base, strict } => {
            app::brackets(&config, base, strict, &mut stdout)?;
        }
        Command::SetLogo { image } => {
            let dest = app::set_logo(&config, &image)?;
            writeln!(stdout, "{}", dest.display())?;
        }
    }

    if let Some(summary) = session.last_summary() {
        info!(user = session.user(), grand_total = %summary.grand_total, "last calculation");
    }

    Ok(())
}
