//! Year-end ISR estimate at the flat corporate rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FiscalRates;
use crate::calculations::common::{non_negative, round_half_up};

/// Accumulated figures for the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualInputs {
    pub income: Decimal,
    pub deductions: Decimal,
    /// Provisional payments made during the year.
    pub provisional_payments: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualEstimate {
    /// Fiscal profit, never negative.
    pub annual_profit: Decimal,
    /// ISR accrued on the profit.
    pub annual_isr: Decimal,
    /// ISR still owed after provisional payments.
    pub annual_due: Decimal,
}

#[derive(Debug, Clone)]
pub struct AnnualEstimator {
    rate: Decimal,
}

impl AnnualEstimator {
    pub fn new(rates: &FiscalRates) -> Self {
        Self {
            rate: rates.corporate_income_tax_rate,
        }
    }

    pub fn estimate(
        &self,
        inputs: &AnnualInputs,
    ) -> AnnualEstimate {
        let annual_profit = non_negative(round_half_up(inputs.income - inputs.deductions));
        let annual_isr = round_half_up(annual_profit * self.rate);
        let annual_due = non_negative(annual_isr - inputs.provisional_payments);

        AnnualEstimate {
            annual_profit,
            annual_isr,
            annual_due,
        }
    }
}
