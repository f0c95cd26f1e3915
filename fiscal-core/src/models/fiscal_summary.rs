use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amounts payable for one period, as produced by
/// [`FiscalSummaryEngine::calculate`](crate::calculations::FiscalSummaryEngine::calculate).
///
/// Every field is non-negative and rounded to cents, and `grand_total` is
/// the exact sum of the other four.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalSummary {
    /// Own income tax payable.
    pub isr_due: Decimal,
    /// Own VAT payable.
    pub iva_due: Decimal,
    /// State payroll tax.
    pub isn_due: Decimal,
    /// Third-party withholdings to pay over.
    pub retentions_total: Decimal,
    pub grand_total: Decimal,
}
