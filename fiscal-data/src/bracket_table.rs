//! Text format for ISR bracket tables.
//!
//! One bracket per line, three comma-separated decimals:
//!
//! ```text
//! lower_bound, fixed_quota, rate_percent
//! 0.01, 0.00, 1.92
//! 7735.01, 148.51, 6.40
//! ```
//!
//! There is no header row. Fields beyond the third are ignored and blank
//! lines are skipped.
//!
//! Two parsers share the format:
//!
//! - [`parse_bracket_table`] is lenient: a line with fewer than three fields
//!   or a non-numeric field is dropped and parsing continues. A completely
//!   malformed text yields an empty table, which the bracket calculator
//!   turns into zero tax. The summary engine always gets *some* table.
//! - [`parse_bracket_table_strict`] stops at the first bad line and reports
//!   its 1-based line number, for validating a table before using it.

use std::str::FromStr;

use csv::StringRecord;
use fiscal_core::{TaxBracket, TaxBracketTable};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// Individual ISR monthly table shipped with the application.
pub const DEFAULT_ISR_TABLE: &str = "\
0.01, 0.00, 1.92
7735.01, 148.51, 6.40
65651.08, 3855.14, 10.88
115375.91, 9265.20, 16.00
134119.42, 12264.16, 17.92
160577.66, 17005.47, 21.36
323862.01, 51883.01, 23.52
510451.01, 95768.74, 30.00
974535.04, 234993.95, 32.00
1299380.05, 338944.34, 34.00
3898140.13, 1222522.76, 35.00";

/// Errors reported by [`parse_bracket_table_strict`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("line {line}: expected 3 fields, found {found}")]
    MissingFields { line: u64, found: usize },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("bracket table has no rows")]
    Empty,
}

impl From<csv::Error> for BracketTableError {
    fn from(err: csv::Error) -> Self {
        BracketTableError::CsvParse(err.to_string())
    }
}

/// The built-in table, parsed.
pub fn default_bracket_table() -> TaxBracketTable {
    parse_bracket_table(DEFAULT_ISR_TABLE)
}

/// Lenient parse: malformed lines are skipped.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_data::parse_bracket_table;
///
/// let table = parse_bracket_table("0.01, 0.00, 1.92\nbroken line\n7735.01, 148.51, 6.40");
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.brackets()[1].fixed_quota, dec!(148.51));
/// ```
pub fn parse_bracket_table(text: &str) -> TaxBracketTable {
    let mut brackets = Vec::new();

    for result in reader(text).records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "skipping unreadable bracket line");
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        match parse_record(&record) {
            Ok(bracket) => brackets.push(bracket),
            Err(e) => debug!(error = %e, "skipping malformed bracket line"),
        }
    }

    TaxBracketTable::new(brackets)
}

/// Strict parse: the first malformed line is an error, as is a table with
/// no rows at all.
pub fn parse_bracket_table_strict(text: &str) -> Result<TaxBracketTable, BracketTableError> {
    let mut brackets = Vec::new();

    for result in reader(text).records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        brackets.push(parse_record(&record)?);
    }

    if brackets.is_empty() {
        return Err(BracketTableError::Empty);
    }
    Ok(TaxBracketTable::new(brackets))
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // rows may carry trailing fields
        .quoting(false) // a stray quote must not swallow the lines after it
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

fn parse_record(record: &StringRecord) -> Result<TaxBracket, BracketTableError> {
    let line = line_of(record);
    if record.len() < 3 {
        return Err(BracketTableError::MissingFields {
            line,
            found: record.len(),
        });
    }

    Ok(TaxBracket {
        lower_bound: parse_field(record, 0, "lower_bound", line)?,
        fixed_quota: parse_field(record, 1, "fixed_quota", line)?,
        rate_percent: parse_field(record, 2, "rate_percent", line)?,
    })
}

fn parse_field(
    record: &StringRecord,
    index: usize,
    field: &'static str,
    line: u64,
) -> Result<Decimal, BracketTableError> {
    let raw = record.get(index).unwrap_or_default();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| BracketTableError::InvalidNumber {
            line,
            field,
            value: raw.to_string(),
        })
}
