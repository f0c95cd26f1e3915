//! Command handlers behind the `fiscal` subcommands.
//!
//! Each handler takes the loaded config and the logged-in [`Session`], writes
//! human-readable output to the given writer and returns `anyhow::Result`, so
//! `main` only parses arguments and wires things together.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fiscal_core::calculations::{
    AnnualEstimate, AnnualEstimator, AnnualInputs, BracketTaxCalculator, FiscalSummaryEngine,
};
use fiscal_core::report::{format_currency, render_annual, with_notes};
use fiscal_core::{FiscalInputs, Regime, TaxBracketTable};
use fiscal_data::{load_inputs_from_file, parse_bracket_table_strict};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, DEFAULT_COMPANY_LOGO};
use crate::pdf::{ReportPage, render_pdf, report_file_name};
use crate::state::Session;

/// Logs in with the users from the config.
pub fn login(
    config: &AppConfig,
    user: &str,
    password: Option<&str>,
) -> Result<Session> {
    Ok(Session::login(&config.users, user, password)?)
}

/// Loads the inputs CSV, optionally forcing every row onto one regime.
pub fn load_inputs(
    path: &Path,
    regime_override: Option<Regime>,
) -> Result<Vec<FiscalInputs>> {
    let mut inputs = load_inputs_from_file(path)
        .with_context(|| format!("Failed to load inputs: {}", path.display()))?;

    if let Some(regime) = regime_override {
        debug!(regime = regime.as_str(), "overriding regime for every row");
        for row in &mut inputs {
            row.regime = regime;
        }
    }
    if inputs.is_empty() {
        warn!(path = %path.display(), "inputs file has no data rows");
    }
    Ok(inputs)
}

fn bracket_table(config: &AppConfig) -> Result<TaxBracketTable> {
    config.bracket_table().context("Failed to load bracket table")
}

/// Prints the text report of every row, separated by a blank line.
pub fn calculate(
    session: &mut Session,
    config: &AppConfig,
    inputs: Vec<FiscalInputs>,
    out: &mut impl Write,
) -> Result<()> {
    let table = bracket_table(config)?;
    let engine = FiscalSummaryEngine::new(config.rates.clone(), &table);

    for (idx, row) in inputs.into_iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        let calculation = session.calculate(&engine, row);
        write!(out, "{}", calculation.report)?;
    }
    Ok(())
}

/// Writes one PDF per row into `output_dir` and returns the paths written.
///
/// Notes, when not blank, are appended to every report body.
pub fn write_reports(
    session: &mut Session,
    config: &AppConfig,
    inputs: Vec<FiscalInputs>,
    output_dir: &Path,
    notes: &str,
    date: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let table = bracket_table(config)?;
    let engine = FiscalSummaryEngine::new(config.rates.clone(), &table);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(inputs.len());
    for row in inputs {
        let calculation = session.calculate(&engine, row);
        let body = with_notes(&calculation.report, notes);
        let client = calculation.inputs.client.display_name();

        let page = ReportPage {
            client: &client,
            body: &body,
            date,
            company_logo: config.report.company_logo.as_deref(),
            developer_logo: config.report.developer_logo.as_deref(),
        };
        let bytes = render_pdf(&page).context("Failed to render PDF")?;

        let path = output_dir.join(report_file_name(
            &calculation.inputs.client,
            calculation.inputs.period,
        ));
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "report written");
        written.push(path);
    }
    Ok(written)
}

/// Prints the year-end estimate.
pub fn annual(
    config: &AppConfig,
    inputs: &AnnualInputs,
    out: &mut impl Write,
) -> Result<AnnualEstimate> {
    let estimate = AnnualEstimator::new(&config.rates).estimate(inputs);
    write!(out, "{}", render_annual(&estimate))?;
    Ok(estimate)
}

/// Prints the configured bracket table and, with `base`, the ISR for it.
///
/// With `strict` the table must parse without a single bad line.
pub fn brackets(
    config: &AppConfig,
    base: Option<Decimal>,
    strict: bool,
    out: &mut impl Write,
) -> Result<()> {
    let table = if strict {
        let text = config.bracket_text().context("Failed to load bracket table")?;
        parse_bracket_table_strict(&text).context("Bracket table is invalid")?
    } else {
        bracket_table(config)?
    };

    writeln!(
        out,
        "{:>16}  {:>16}  {:>10}",
        "LÍMITE INFERIOR", "CUOTA FIJA", "% EXCEDENTE"
    )?;
    for bracket in table.brackets() {
        writeln!(
            out,
            "{:>16}  {:>16}  {:>10}",
            format_currency(bracket.lower_bound),
            format_currency(bracket.fixed_quota),
            format!("{:.2}%", bracket.rate_percent)
        )?;
    }

    if let Some(base) = base {
        let tax = BracketTaxCalculator::new(&table).compute(base);
        writeln!(out)?;
        writeln!(
            out,
            "ISR para base {}: {}",
            format_currency(base),
            format_currency(tax)
        )?;
    }
    Ok(())
}

/// Checks `image` decodes and stores it as the company logo, where the next
/// report picks it up.
///
/// The image is re-encoded in the format implied by the destination's
/// extension.
pub fn set_logo(
    config: &AppConfig,
    image_path: &Path,
) -> Result<PathBuf> {
    let img = image::open(image_path)
        .with_context(|| format!("Not a readable image: {}", image_path.display()))?;

    let dest = config
        .report
        .company_logo
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPANY_LOGO));
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    img.save(&dest)
        .with_context(|| format!("Failed to save logo: {}", dest.display()))?;
    info!(path = %dest.display(), "company logo updated");
    Ok(dest)
}
