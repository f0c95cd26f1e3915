use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Client, Period, Regime};

/// Own income-tax figures ("ISR propio").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxInputs {
    /// Invoiced income for the period.
    pub income: Decimal,
    /// Customer advances received.
    pub advances: Decimal,
    /// Profit coefficient, used by the general regime only.
    pub profit_coefficient: Decimal,
    /// Employee profit sharing (PTU) paid.
    pub profit_sharing_paid: Decimal,
    /// Tax losses from prior years applied this period.
    pub prior_losses: Decimal,
    /// Authorized deductions and expenses.
    pub deductions: Decimal,
    /// Provisional payments already made this year.
    pub prior_provisional_payments: Decimal,
    /// ISR withheld by banks on interest.
    pub bank_withholding: Decimal,
    /// Other ISR withheld from the taxpayer (10% / 1.25%).
    pub other_withholding: Decimal,
}

impl IncomeTaxInputs {
    /// Income plus advances.
    pub fn total_income(&self) -> Decimal {
        self.income + self.advances
    }

    /// ISR already withheld from the taxpayer.
    pub fn total_withholding(&self) -> Decimal {
        self.bank_withholding + self.other_withholding
    }
}

/// Own VAT figures ("IVA propio").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatInputs {
    /// VAT paid on imports.
    pub import_vat: Decimal,
    /// VAT withheld by customers.
    pub client_withheld_vat: Decimal,
    /// VAT credit carried over from prior periods.
    pub prior_vat_credit: Decimal,
    /// Offsets against other tax balances.
    pub offsets: Decimal,
}

/// Taxes withheld from third parties that must be paid over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyWithholdings {
    pub vat_withheld: Decimal,
    pub professional_services_isr_withheld: Decimal,
    pub payroll_isr_withheld: Decimal,
    pub cedular_withheld: Decimal,
}

impl ThirdPartyWithholdings {
    pub fn total(&self) -> Decimal {
        self.vat_withheld
            + self.professional_services_isr_withheld
            + self.payroll_isr_withheld
            + self.cedular_withheld
    }
}

/// Payroll components subject to ISN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInputs {
    /// Headcount. Informational; no formula uses it.
    pub employee_count: u32,
    pub salary: Decimal,
    pub punctuality_bonus: Decimal,
    pub attendance_bonus: Decimal,
    pub grocery_stipend: Decimal,
    /// Overtime and awards.
    pub overtime: Decimal,
    /// Christmas bonus, vacation premium and similar benefits.
    pub other_benefits: Decimal,
}

impl PayrollInputs {
    pub fn total(&self) -> Decimal {
        self.salary
            + self.punctuality_bonus
            + self.attendance_bonus
            + self.grocery_stipend
            + self.overtime
            + self.other_benefits
    }
}

/// Everything a single monthly calculation needs.
///
/// Amounts are expected to be non-negative; the input layer rejects
/// negative entries before they get here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalInputs {
    pub client: Client,
    pub period: Period,
    pub regime: Regime,
    pub income_tax: IncomeTaxInputs,
    pub vat: VatInputs,
    pub withholdings: ThirdPartyWithholdings,
    pub payroll: PayrollInputs,
}

impl FiscalInputs {
    /// All-zero inputs for the given period and regime.
    pub fn new(
        client: Client,
        period: Period,
        regime: Regime,
    ) -> Self {
        Self {
            client,
            period,
            regime,
            income_tax: IncomeTaxInputs::default(),
            vat: VatInputs::default(),
            withholdings: ThirdPartyWithholdings::default(),
            payroll: PayrollInputs::default(),
        }
    }
}
