//! Plain-text fiscal report.
//!
//! The layout is fixed; the PDF renderer prints it verbatim in a monospaced
//! font, so column alignment here is what the reader sees.
//!
//! ```text
//! REPORTE FISCAL | CLIENTE GENERAL | ENE
//! -------------------------------------------
//! 1. ISR PROPIO:       $5,416.30
//! 2. IVA PROPIO:       $12,800.00
//! 3. ISN (3%):         $0.00
//! 4. RETENCIONES:      $0.00
//! -------------------------------------------
//! TOTAL A PAGAR:       $18,216.30
//! -------------------------------------------
//! Elaboró: admin
//! ```

use rust_decimal::Decimal;

use crate::calculations::AnnualEstimate;
use crate::calculations::common::round_half_up;
use crate::{FiscalInputs, FiscalRates, FiscalSummary};

pub const REPORT_TITLE: &str = "REPORTE FISCAL";
pub const ANNUAL_TITLE: &str = "ESTIMACIÓN ANUAL";

const RULE_WIDTH: usize = 43;
const LABEL_WIDTH: usize = 21;

/// Formats an amount as `$1,234.56`, rounding half-up to cents.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::report::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
/// assert_eq!(format_currency(dec!(0)), "$0.00");
/// assert_eq!(format_currency(dec!(-950.5)), "-$950.50");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(integer_part.len() + integer_part.len() / 3);
    for (i, c) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}${grouped}.{decimal_part}")
}

/// Renders the summary text for one calculation.
///
/// The result ends with a newline after the author line.
pub fn render_summary(
    inputs: &FiscalInputs,
    summary: &FiscalSummary,
    rates: &FiscalRates,
    author: &str,
) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let isn_label = format!("3. ISN ({}):", rates.payroll_tax_label());

    let lines = [
        format!(
            "{REPORT_TITLE} | {} | {}",
            inputs.client.display_name(),
            inputs.period
        ),
        rule.clone(),
        amount_line("1. ISR PROPIO:", summary.isr_due),
        amount_line("2. IVA PROPIO:", summary.iva_due),
        amount_line(&isn_label, summary.isn_due),
        amount_line("4. RETENCIONES:", summary.retentions_total),
        rule.clone(),
        amount_line("TOTAL A PAGAR:", summary.grand_total),
        rule,
        format!("Elaboró: {author}"),
    ];

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Renders the year-end estimate in the same column layout as the
/// monthly summary.
pub fn render_annual(estimate: &AnnualEstimate) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let lines = [
        ANNUAL_TITLE.to_string(),
        rule.clone(),
        amount_line("UTILIDAD FISCAL:", estimate.annual_profit),
        amount_line("ISR DEL EJERCICIO:", estimate.annual_isr),
        rule,
        amount_line("ISR A CARGO:", estimate.annual_due),
    ];

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Appends free-form notes below the summary. Blank notes add nothing.
pub fn with_notes(
    report: &str,
    notes: &str,
) -> String {
    let notes = notes.trim();
    if notes.is_empty() {
        report.to_string()
    } else {
        format!("{report}\nNOTAS: {notes}")
    }
}

fn amount_line(
    label: &str,
    amount: Decimal,
) -> String {
    format!("{label:<LABEL_WIDTH$}{}", format_currency(amount))
}
