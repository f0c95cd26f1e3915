use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`FiscalRates::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FiscalRatesError {
    #[error("payroll tax rate must be between 0 and 1, got {0}")]
    InvalidPayrollTaxRate(Decimal),

    #[error("corporate income tax rate must be between 0 and 1, got {0}")]
    InvalidCorporateIncomeTaxRate(Decimal),

    #[error("VAT rate must be between 0 and 1, got {0}")]
    InvalidVatRate(Decimal),
}

/// Flat rates applied by the summary engine, expressed as fractions.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::FiscalRates;
///
/// let rates = FiscalRates::default();
///
/// assert_eq!(rates.payroll_tax_rate, dec!(0.03));
/// assert_eq!(rates.corporate_income_tax_rate, dec!(0.30));
/// assert_eq!(rates.vat_rate, dec!(0.16));
/// assert!(rates.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalRates {
    /// State payroll tax (ISN) over total payroll.
    pub payroll_tax_rate: Decimal,

    /// ISR rate for the general and simplified corporate regimes.
    pub corporate_income_tax_rate: Decimal,

    /// IVA rate, applied to both output and input VAT.
    pub vat_rate: Decimal,
}

impl Default for FiscalRates {
    fn default() -> Self {
        Self {
            payroll_tax_rate: Decimal::new(3, 2),
            corporate_income_tax_rate: Decimal::new(30, 2),
            vat_rate: Decimal::new(16, 2),
        }
    }
}

impl FiscalRates {
    /// Checks every rate lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), FiscalRatesError> {
        if !is_fraction(self.payroll_tax_rate) {
            return Err(FiscalRatesError::InvalidPayrollTaxRate(
                self.payroll_tax_rate,
            ));
        }
        if !is_fraction(self.corporate_income_tax_rate) {
            return Err(FiscalRatesError::InvalidCorporateIncomeTaxRate(
                self.corporate_income_tax_rate,
            ));
        }
        if !is_fraction(self.vat_rate) {
            return Err(FiscalRatesError::InvalidVatRate(self.vat_rate));
        }
        Ok(())
    }

    /// Payroll rate as a percentage label, e.g. `3%`.
    pub fn payroll_tax_label(&self) -> String {
        format!("{}%", (self.payroll_tax_rate * Decimal::ONE_HUNDRED).normalize())
    }
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}
