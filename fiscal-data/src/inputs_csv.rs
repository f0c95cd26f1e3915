//! CSV loader for monthly fiscal inputs.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Header
//! names are case-sensitive.
//!
//! | Column                              | Required | Notes                                    |
//! |-------------------------------------|----------|------------------------------------------|
//! | `period`                            | yes      | `ENE` .. `DIC`, case-insensitive         |
//! | `regime`                            | yes      | `GENERAL`, `RESICO`, `PF` or the label   |
//! | `income`                            | yes      | decimal                                  |
//! | `client`                            | no       | empty or absent reads as CLIENTE GENERAL |
//! | `rfc`                               | no       |                                          |
//! | `employee_count`                    | no       | integer                                  |
//! | any other amount column (see below) | no       | empty or absent reads as zero            |
//!
//! Amount columns: `advances`, `profit_coefficient`, `profit_sharing_paid`,
//! `prior_losses`, `deductions`, `prior_provisional_payments`,
//! `bank_withholding`, `other_withholding`, `import_vat`,
//! `client_withheld_vat`, `prior_vat_credit`, `vat_offsets`, `vat_withheld`,
//! `professional_services_isr_withheld`, `payroll_isr_withheld`,
//! `cedular_withheld`, `salary`, `punctuality_bonus`, `attendance_bonus`,
//! `grocery_stipend`, `overtime`, `other_benefits`.
//!
//! Negative amounts are rejected.
//!
//! ### Minimal example
//!
//! ```csv
//! period,regime,income
//! ENE,PF,100000.00
//! ```
use std::path::Path;

use fiscal_core::{
    Client, FiscalInputs, IncomeTaxInputs, PayrollInputs, Period, Regime,
    ThirdPartyWithholdings, VatInputs,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    client: Option<String>,
    #[serde(default)]
    rfc: Option<String>,
    period: String,
    regime: String,
    income: Decimal,
    #[serde(default)]
    advances: Option<Decimal>,
    #[serde(default)]
    profit_coefficient: Option<Decimal>,
    #[serde(default)]
    profit_sharing_paid: Option<Decimal>,
    #[serde(default)]
    prior_losses: Option<Decimal>,
    #[serde(default)]
    deductions: Option<Decimal>,
    #[serde(default)]
    prior_provisional_payments: Option<Decimal>,
    #[serde(default)]
    bank_withholding: Option<Decimal>,
    #[serde(default)]
    other_withholding: Option<Decimal>,
    #[serde(default)]
    import_vat: Option<Decimal>,
    #[serde(default)]
    client_withheld_vat: Option<Decimal>,
    #[serde(default)]
    prior_vat_credit: Option<Decimal>,
    #[serde(default)]
    vat_offsets: Option<Decimal>,
    #[serde(default)]
    vat_withheld: Option<Decimal>,
    #[serde(default)]
    professional_services_isr_withheld: Option<Decimal>,
    #[serde(default)]
    payroll_isr_withheld: Option<Decimal>,
    #[serde(default)]
    cedular_withheld: Option<Decimal>,
    #[serde(default)]
    employee_count: Option<u32>,
    #[serde(default)]
    salary: Option<Decimal>,
    #[serde(default)]
    punctuality_bonus: Option<Decimal>,
    #[serde(default)]
    attendance_bonus: Option<Decimal>,
    #[serde(default)]
    grocery_stipend: Option<Decimal>,
    #[serde(default)]
    overtime: Option<Decimal>,
    #[serde(default)]
    other_benefits: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting input rows.
///
/// Row numbers are 1-based and count data rows only (header = row 0).
#[derive(Debug, thiserror::Error)]
pub enum InputsLoadError {
    /// Bad structure, missing required column, or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to read inputs file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognised regime '{value}' on row {row}")]
    InvalidRegime { value: String, row: usize },

    #[error("unrecognised period '{value}' on row {row}")]
    InvalidPeriod { value: String, row: usize },

    #[error("negative amount in column '{field}' on row {row}")]
    NegativeAmount { field: &'static str, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn amount(
    value: Option<Decimal>,
    field: &'static str,
    row: usize,
) -> Result<Decimal, InputsLoadError> {
    let value = value.unwrap_or_default();
    if value < Decimal::ZERO {
        return Err(InputsLoadError::NegativeAmount { field, row });
    }
    Ok(value)
}

/// Convert a single CSV row into [`FiscalInputs`].
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<FiscalInputs, InputsLoadError> {
    let period = Period::parse(&row.period).ok_or_else(|| InputsLoadError::InvalidPeriod {
        value: row.period.clone(),
        row: row_number,
    })?;
    let regime = Regime::parse(&row.regime).ok_or_else(|| InputsLoadError::InvalidRegime {
        value: row.regime.clone(),
        row: row_number,
    })?;

    let client = match row.client.filter(|name| !name.trim().is_empty()) {
        Some(name) => Client::new(name.trim(), row.rfc),
        None => Client::general(),
    };
    if let Err(e) = client.validate_rfc() {
        warn!(row = row_number, error = %e, "client RFC does not look valid");
    }

    let r = row_number;
    Ok(FiscalInputs {
        client,
        period,
        regime,
        income_tax: IncomeTaxInputs {
            income: amount(Some(row.income), "income", r)?,
            advances: amount(row.advances, "advances", r)?,
            profit_coefficient: amount(row.profit_coefficient, "profit_coefficient", r)?,
            profit_sharing_paid: amount(row.profit_sharing_paid, "profit_sharing_paid", r)?,
            prior_losses: amount(row.prior_losses, "prior_losses", r)?,
            deductions: amount(row.deductions, "deductions", r)?,
            prior_provisional_payments: amount(
                row.prior_provisional_payments,
                "prior_provisional_payments",
                r,
            )?,
            bank_withholding: amount(row.bank_withholding, "bank_withholding", r)?,
            other_withholding: amount(row.other_withholding, "other_withholding", r)?,
        },
        vat: VatInputs {
            import_vat: amount(row.import_vat, "import_vat", r)?,
            client_withheld_vat: amount(row.client_withheld_vat, "client_withheld_vat", r)?,
            prior_vat_credit: amount(row.prior_vat_credit, "prior_vat_credit", r)?,
            offsets: amount(row.vat_offsets, "vat_offsets", r)?,
        },
        withholdings: ThirdPartyWithholdings {
            vat_withheld: amount(row.vat_withheld, "vat_withheld", r)?,
            professional_services_isr_withheld: amount(
                row.professional_services_isr_withheld,
                "professional_services_isr_withheld",
                r,
            )?,
            payroll_isr_withheld: amount(row.payroll_isr_withheld, "payroll_isr_withheld", r)?,
            cedular_withheld: amount(row.cedular_withheld, "cedular_withheld", r)?,
        },
        payroll: PayrollInputs {
            employee_count: row.employee_count.unwrap_or_default(),
            salary: amount(row.salary, "salary", r)?,
            punctuality_bonus: amount(row.punctuality_bonus, "punctuality_bonus", r)?,
            attendance_bonus: amount(row.attendance_bonus, "attendance_bonus", r)?,
            grocery_stipend: amount(row.grocery_stipend, "grocery_stipend", r)?,
            overtime: amount(row.overtime, "overtime", r)?,
            other_benefits: amount(row.other_benefits, "other_benefits", r)?,
        },
    })
}

/// Parse CSV text and return one [`FiscalInputs`] per data row, in file order.
///
/// # Errors
///
/// * [`InputsLoadError::Parse`] if the CSV is structurally invalid or a
///   required column is missing or not a number.
/// * [`InputsLoadError::InvalidPeriod`] / [`InputsLoadError::InvalidRegime`]
///   for unrecognised codes.
/// * [`InputsLoadError::NegativeAmount`] for any amount below zero.
pub fn load_inputs_from_str(input: &str) -> Result<Vec<FiscalInputs>, InputsLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let inputs = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = inputs.len(), "loaded fiscal inputs");
    Ok(inputs)
}

/// Read a file from disk and delegate to [`load_inputs_from_str`].
pub fn load_inputs_from_file(path: &Path) -> Result<Vec<FiscalInputs>, InputsLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_inputs_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const MINIMAL_CSV: &str = "\
period,regime,income
ENE,PF,100000.00
";

    const FULL_CSV: &str = "\
client,rfc,period,regime,income,advances,profit_coefficient,profit_sharing_paid,prior_losses,deductions,prior_provisional_payments,bank_withholding,other_withholding,import_vat,client_withheld_vat,prior_vat_credit,vat_offsets,vat_withheld,professional_services_isr_withheld,payroll_isr_withheld,cedular_withheld,employee_count,salary,punctuality_bonus,attendance_bonus,grocery_stipend,overtime,other_benefits
Empresa S.A.,EMP010101AB1,MAR,GENERAL,500000,10000,0.25,3000,2000,0,50000,150,250,1000,500,300,200,1200,800,4000,100,12,90000,2000,2000,3000,1500,1500
";

    // -----------------------------------------------------------------------
    // Minimal and full rows
    // -----------------------------------------------------------------------

    #[test]
    fn minimal_csv_defaults_everything_else() {
        let inputs = load_inputs_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(inputs.len(), 1);
        let i = &inputs[0];
        assert_eq!(i.client, Client::general());
        assert_eq!(i.period, Period::Ene);
        assert_eq!(i.regime, Regime::Individual);
        assert_eq!(i.income_tax.income, dec!(100000.00));
        assert_eq!(i.income_tax.deductions, Decimal::ZERO);
        assert_eq!(i.payroll.total(), Decimal::ZERO);
        assert_eq!(i.payroll.employee_count, 0);
    }

    #[test]
    fn full_csv_populates_every_group() {
        let inputs = load_inputs_from_str(FULL_CSV).expect("should parse full CSV");
        let i = &inputs[0];

        assert_eq!(
            i.client,
            Client::new("Empresa S.A.", Some("EMP010101AB1".to_string()))
        );
        assert_eq!(i.period, Period::Mar);
        assert_eq!(i.regime, Regime::General);
        assert_eq!(i.income_tax.total_income(), dec!(510000));
        assert_eq!(i.income_tax.profit_coefficient, dec!(0.25));
        assert_eq!(i.income_tax.total_withholding(), dec!(400));
        assert_eq!(i.vat.offsets, dec!(200));
        assert_eq!(i.withholdings.total(), dec!(6100));
        assert_eq!(i.payroll.employee_count, 12);
        assert_eq!(i.payroll.total(), dec!(100000));
    }

    #[test]
    fn empty_optional_cells_read_as_zero() {
        let csv = "client,period,regime,income,deductions,salary\n,FEB,RESICO,1000,,\n";

        let inputs = load_inputs_from_str(csv).expect("should parse");

        assert_eq!(inputs[0].client, Client::general());
        assert_eq!(inputs[0].income_tax.deductions, Decimal::ZERO);
        assert_eq!(inputs[0].payroll.salary, Decimal::ZERO);
    }

    #[test]
    fn rows_keep_file_order() {
        let csv = "period,regime,income\nENE,PF,1\nFEB,GENERAL,2\nDIC,resico,3\n";

        let inputs = load_inputs_from_str(csv).expect("should parse");

        let periods: Vec<Period> = inputs.iter().map(|i| i.period).collect();
        assert_eq!(periods, vec![Period::Ene, Period::Feb, Period::Dic]);
        assert_eq!(inputs[2].regime, Regime::Simplified);
    }

    #[test]
    fn header_only_csv_is_empty() {
        let inputs = load_inputs_from_str("period,regime,income\n").expect("header-only is valid");

        assert!(inputs.is_empty());
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn invalid_regime_reports_row() {
        let csv = "period,regime,income\nENE,PF,1\nENE,BOGUS,1\n";

        match load_inputs_from_str(csv).unwrap_err() {
            InputsLoadError::InvalidRegime { value, row } => {
                assert_eq!(value, "BOGUS");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidRegime, got {other:?}"),
        }
    }

    #[test]
    fn invalid_period_reports_row() {
        let csv = "period,regime,income\nENERO,PF,1\n";

        match load_inputs_from_str(csv).unwrap_err() {
            InputsLoadError::InvalidPeriod { value, row } => {
                assert_eq!(value, "ENERO");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidPeriod, got {other:?}"),
        }
    }

    #[test]
    fn negative_amount_is_rejected() {
        let csv = "period,regime,income,deductions\nENE,PF,1000,-5\n";

        match load_inputs_from_str(csv).unwrap_err() {
            InputsLoadError::NegativeAmount { field, row } => {
                assert_eq!(field, "deductions");
                assert_eq!(row, 1);
            }
            other => panic!("expected NegativeAmount, got {other:?}"),
        }
    }

    #[test]
    fn missing_income_column_is_parse_error() {
        let csv = "period,regime\nENE,PF\n";

        assert!(matches!(
            load_inputs_from_str(csv).unwrap_err(),
            InputsLoadError::Parse(_)
        ));
    }

    #[test]
    fn non_numeric_amount_is_parse_error() {
        let csv = "period,regime,income\nENE,PF,mucho\n";

        assert!(matches!(
            load_inputs_from_str(csv).unwrap_err(),
            InputsLoadError::Parse(_)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_inputs_from_file(Path::new("/definitely/not/here.csv"));

        assert!(matches!(result.unwrap_err(), InputsLoadError::Io(_)));
    }
}
