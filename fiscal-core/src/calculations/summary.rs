//! Monthly fiscal summary: own ISR, own IVA, payroll tax (ISN), and the
//! third-party withholdings to pay over.
//!
//! # Calculation steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total payroll = salary + bonuses + grocery stipend + overtime + other benefits |
//! | 2    | ISN = total payroll × payroll tax rate |
//! | 3    | Taxable base, by regime (see below) |
//! | 4    | Accrued ISR: flat corporate rate, or bracket table for individuals |
//! | 5    | ISR due = max(0, accrued − provisional payments − own withholdings) |
//! | 6    | Output VAT = (income + advances) × VAT rate |
//! | 7    | Input VAT = deductions × VAT rate + import VAT |
//! | 8    | IVA due = max(0, output − input − VAT withheld by clients − prior credit − offsets) |
//! | 9    | Retentions = sum of third-party withholdings |
//! | 10   | Grand total = ISR + IVA + ISN + retentions |
//!
//! Taxable base by regime:
//!
//! | Regime     | Base |
//! |------------|------|
//! | General    | max(0, (income + advances) × profit coefficient − PTU − prior losses) |
//! | Simplified | max(0, (income + advances) − deductions − total payroll − PTU − prior losses) |
//! | Individual | same as Simplified |
//!
//! Intermediate amounts keep full precision. Each summary line is rounded to
//! cents once, so the grand total is the exact sum of the four rounded
//! components.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fiscal_core::calculations::FiscalSummaryEngine;
//! use fiscal_core::{Client, FiscalInputs, FiscalRates, Period, Regime, TaxBracket, TaxBracketTable};
//!
//! let table = TaxBracketTable::new(vec![
//!     TaxBracket::new(dec!(0.01), dec!(0.00), dec!(1.92)),
//!     TaxBracket::new(dec!(7735.01), dec!(148.51), dec!(6.40)),
//!     TaxBracket::new(dec!(65651.08), dec!(3855.14), dec!(10.88)),
//!     TaxBracket::new(dec!(115375.91), dec!(9265.20), dec!(16.00)),
//! ]);
//!
//! let mut inputs = FiscalInputs::new(Client::general(), Period::Ene, Regime::Individual);
//! inputs.income_tax.income = dec!(100000);
//! inputs.income_tax.deductions = dec!(20000);
//!
//! let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
//! let summary = engine.calculate(&inputs);
//!
//! assert_eq!(summary.isr_due, dec!(5416.30));
//! assert_eq!(summary.iva_due, dec!(12800.00));
//! assert_eq!(summary.grand_total, dec!(18216.30));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::BracketTaxCalculator;
use crate::calculations::common::{non_negative, round_half_up};
use crate::{FiscalInputs, FiscalRates, FiscalSummary, PayrollInputs, Regime, TaxBracketTable};

/// Computes a [`FiscalSummary`] from one set of [`FiscalInputs`].
///
/// The engine holds no mutable state; every call returns a fresh summary
/// owned by the caller.
#[derive(Debug, Clone)]
pub struct FiscalSummaryEngine<'a> {
    rates: FiscalRates,
    brackets: &'a TaxBracketTable,
}

impl<'a> FiscalSummaryEngine<'a> {
    /// Creates an engine with the given flat rates and the bracket table used
    /// for the individual regime.
    pub fn new(
        rates: FiscalRates,
        brackets: &'a TaxBracketTable,
    ) -> Self {
        Self { rates, brackets }
    }

    pub fn rates(&self) -> &FiscalRates {
        &self.rates
    }

    /// Runs every step and aggregates the result.
    pub fn calculate(
        &self,
        inputs: &FiscalInputs,
    ) -> FiscalSummary {
        let total_payroll = self.total_payroll(&inputs.payroll);
        let isn_due = self.payroll_tax(total_payroll);

        let isr_accrued = self.accrued_income_tax(inputs);
        let isr_due = self.income_tax_due(inputs, isr_accrued);

        let iva_due = self.vat_due(inputs);
        let retentions_total = round_half_up(inputs.withholdings.total());

        let grand_total = isr_due + iva_due + isn_due + retentions_total;

        debug!(
            client = %inputs.client.display_name(),
            period = %inputs.period,
            regime = inputs.regime.as_str(),
            %isr_accrued,
            %isr_due,
            %iva_due,
            %isn_due,
            %retentions_total,
            %grand_total,
            "fiscal summary calculated"
        );

        FiscalSummary {
            isr_due,
            iva_due,
            isn_due,
            retentions_total,
            grand_total,
        }
    }

    /// Sum of every payroll component.
    pub fn total_payroll(
        &self,
        payroll: &PayrollInputs,
    ) -> Decimal {
        payroll.total()
    }

    /// ISN over the total payroll.
    fn payroll_tax(
        &self,
        total_payroll: Decimal,
    ) -> Decimal {
        round_half_up(total_payroll * self.rates.payroll_tax_rate)
    }

    /// ISR taxable base for the inputs' regime, never negative.
    pub fn taxable_base(
        &self,
        inputs: &FiscalInputs,
    ) -> Decimal {
        let isr = &inputs.income_tax;
        let base = match inputs.regime {
            Regime::General => {
                isr.total_income() * isr.profit_coefficient
                    - isr.profit_sharing_paid
                    - isr.prior_losses
            }
            Regime::Simplified | Regime::Individual => {
                isr.total_income()
                    - isr.deductions
                    - self.total_payroll(&inputs.payroll)
                    - isr.profit_sharing_paid
                    - isr.prior_losses
            }
        };
        non_negative(base)
    }

    /// ISR accrued before provisional payments and withholdings.
    pub fn accrued_income_tax(
        &self,
        inputs: &FiscalInputs,
    ) -> Decimal {
        let base = self.taxable_base(inputs);
        match inputs.regime {
            Regime::General | Regime::Simplified => base * self.rates.corporate_income_tax_rate,
            Regime::Individual => BracketTaxCalculator::new(self.brackets).compute(base),
        }
    }

    /// ISR payable after provisional payments and own withholdings.
    fn income_tax_due(
        &self,
        inputs: &FiscalInputs,
        accrued: Decimal,
    ) -> Decimal {
        let isr = &inputs.income_tax;
        non_negative(round_half_up(
            accrued - isr.prior_provisional_payments - isr.total_withholding(),
        ))
    }

    /// VAT charged on income plus advances.
    fn output_vat(
        &self,
        inputs: &FiscalInputs,
    ) -> Decimal {
        inputs.income_tax.total_income() * self.rates.vat_rate
    }

    /// Creditable VAT: VAT on deductions plus import VAT.
    fn input_vat(
        &self,
        inputs: &FiscalInputs,
    ) -> Decimal {
        inputs.income_tax.deductions * self.rates.vat_rate + inputs.vat.import_vat
    }

    /// IVA payable. Only the final balance is clamped.
    fn vat_due(
        &self,
        inputs: &FiscalInputs,
    ) -> Decimal {
        let balance =
            self.output_vat(inputs) - self.input_vat(inputs) - inputs.vat.client_withheld_vat;
        non_negative(round_half_up(
            balance - inputs.vat.prior_vat_credit - inputs.vat.offsets,
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{Client, Period, TaxBracket};

    fn default_table() -> TaxBracketTable {
        TaxBracketTable::new(vec![
            TaxBracket::new(dec!(0.01), dec!(0.00), dec!(1.92)),
            TaxBracket::new(dec!(7735.01), dec!(148.51), dec!(6.40)),
            TaxBracket::new(dec!(65651.08), dec!(3855.14), dec!(10.88)),
            TaxBracket::new(dec!(115375.91), dec!(9265.20), dec!(16.00)),
            TaxBracket::new(dec!(134119.42), dec!(12264.16), dec!(17.92)),
            TaxBracket::new(dec!(160577.66), dec!(17005.47), dec!(21.36)),
            TaxBracket::new(dec!(323862.01), dec!(51883.01), dec!(23.52)),
            TaxBracket::new(dec!(510451.01), dec!(95768.74), dec!(30.00)),
            TaxBracket::new(dec!(974535.04), dec!(234993.95), dec!(32.00)),
            TaxBracket::new(dec!(1299380.05), dec!(338944.34), dec!(34.00)),
            TaxBracket::new(dec!(3898140.13), dec!(1222522.76), dec!(35.00)),
        ])
    }

    fn test_inputs(regime: Regime) -> FiscalInputs {
        let mut inputs = FiscalInputs::new(Client::general(), Period::Mar, regime);
        inputs.income_tax.income = dec!(100000);
        inputs.income_tax.deductions = dec!(20000);
        inputs.income_tax.profit_coefficient = dec!(0.5);
        inputs
    }

    // =========================================================================
    // payroll tests
    // =========================================================================

    #[test]
    fn payroll_tax_is_three_percent_of_total_payroll() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.payroll = PayrollInputs {
            employee_count: 5,
            salary: dec!(40000),
            punctuality_bonus: dec!(1000),
            attendance_bonus: dec!(1000),
            grocery_stipend: dec!(2500),
            overtime: dec!(1500),
            other_benefits: dec!(4000),
        };

        let summary = engine.calculate(&inputs);

        assert_eq!(engine.total_payroll(&inputs.payroll), dec!(50000));
        assert_eq!(summary.isn_due, dec!(1500.00));
    }

    #[test]
    fn payroll_tax_follows_configured_rate() {
        let table = default_table();
        let rates = FiscalRates {
            payroll_tax_rate: dec!(0.025),
            ..Default::default()
        };
        let engine = FiscalSummaryEngine::new(rates, &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.payroll.salary = dec!(10000);

        let summary = engine.calculate(&inputs);

        assert_eq!(summary.isn_due, dec!(250.00));
    }

    // =========================================================================
    // taxable_base tests
    // =========================================================================

    #[test]
    fn general_base_applies_profit_coefficient() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.income_tax.profit_sharing_paid = dec!(5000);
        inputs.income_tax.prior_losses = dec!(10000);

        // 100000 * 0.5 - 5000 - 10000
        assert_eq!(engine.taxable_base(&inputs), dec!(35000));
    }

    #[test]
    fn general_base_ignores_deductions_and_payroll() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.payroll.salary = dec!(30000);

        assert_eq!(engine.taxable_base(&inputs), dec!(50000));
    }

    #[test]
    fn general_base_includes_advances() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.income_tax.advances = dec!(20000);

        assert_eq!(engine.taxable_base(&inputs), dec!(60000));
    }

    #[test]
    fn simplified_base_subtracts_deductions_and_payroll() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::Simplified);
        inputs.payroll.salary = dec!(50000);

        // 100000 - 20000 - 50000
        assert_eq!(engine.taxable_base(&inputs), dec!(30000));
    }

    #[test]
    fn taxable_base_clamps_losses_to_zero() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);

        for regime in Regime::all() {
            let mut inputs = test_inputs(*regime);
            inputs.income_tax.prior_losses = dec!(500000);

            assert_eq!(engine.taxable_base(&inputs), dec!(0), "regime {regime:?}");
        }
    }

    // =========================================================================
    // accrued_income_tax tests
    // =========================================================================

    #[test]
    fn regimes_produce_distinct_accrued_tax() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);

        let general = engine.accrued_income_tax(&test_inputs(Regime::General));
        let simplified = engine.accrued_income_tax(&test_inputs(Regime::Simplified));
        let individual = engine.accrued_income_tax(&test_inputs(Regime::Individual));

        // 50000 * 0.30, 80000 * 0.30, bracket tax on 80000
        assert_eq!(general, dec!(15000.00));
        assert_eq!(simplified, dec!(24000.00));
        assert_eq!(individual, dec!(5416.30));
    }

    #[test]
    fn individual_regime_uses_bracket_table() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::Individual);
        inputs.income_tax.deductions = dec!(92264.99);

        // Base 7735.01 lands exactly on the second bracket.
        assert_eq!(engine.accrued_income_tax(&inputs), dec!(148.51));
    }

    #[test]
    fn individual_regime_with_empty_table_accrues_nothing() {
        let table = TaxBracketTable::default();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);

        assert_eq!(engine.accrued_income_tax(&test_inputs(Regime::Individual)), dec!(0));
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn calculate_individual_end_to_end() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let inputs = test_inputs(Regime::Individual);

        let summary = engine.calculate(&inputs);

        assert_eq!(
            summary,
            FiscalSummary {
                isr_due: dec!(5416.30),
                // 16000 output - 3200 input
                iva_due: dec!(12800.00),
                isn_due: dec!(0.00),
                retentions_total: dec!(0.00),
                grand_total: dec!(18216.30),
            }
        );
    }

    #[test]
    fn provisional_payments_above_accrued_clamp_to_zero() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::Individual);
        inputs.income_tax.prior_provisional_payments = dec!(10000);

        let summary = engine.calculate(&inputs);

        assert_eq!(summary.isr_due, dec!(0));
    }

    #[test]
    fn own_withholdings_reduce_isr_due() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::Individual);
        inputs.income_tax.bank_withholding = dec!(100);
        inputs.income_tax.other_withholding = dec!(316.30);
        inputs.income_tax.prior_provisional_payments = dec!(1000);

        let summary = engine.calculate(&inputs);

        assert_eq!(summary.isr_due, dec!(4000.00));
    }

    #[test]
    fn vat_due_subtracts_credits_and_withheld_vat() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.vat.import_vat = dec!(500);
        inputs.vat.client_withheld_vat = dec!(1000);
        inputs.vat.prior_vat_credit = dec!(300);
        inputs.vat.offsets = dec!(1000);

        let summary = engine.calculate(&inputs);

        // 16000 - (3200 + 500) - 1000 - 300 - 1000
        assert_eq!(summary.iva_due, dec!(10000.00));
    }

    #[test]
    fn vat_due_rounds_only_the_final_balance() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.income_tax.income = dec!(100000.04);
        inputs.income_tax.deductions = dec!(20000.03);

        let summary = engine.calculate(&inputs);

        // 16000.0064 - 3200.0048 = 12800.0016
        assert_eq!(summary.iva_due, dec!(12800.00));
    }

    #[test]
    fn general_isr_rounds_only_the_final_amount() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.income_tax.income = dec!(100000.03);

        assert_eq!(engine.taxable_base(&inputs), dec!(50000.015));
        // 50000.015 * 0.30 = 15000.0045
        assert_eq!(engine.calculate(&inputs).isr_due, dec!(15000.00));
    }

    #[test]
    fn vat_due_clamps_credit_balance_to_zero() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.income_tax.income = dec!(10000);
        inputs.income_tax.deductions = dec!(50000);

        let summary = engine.calculate(&inputs);

        assert_eq!(summary.iva_due, dec!(0));
    }

    #[test]
    fn retentions_are_a_straight_sum() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::General);
        inputs.withholdings.vat_withheld = dec!(1066.67);
        inputs.withholdings.professional_services_isr_withheld = dec!(1000);
        inputs.withholdings.payroll_isr_withheld = dec!(3500.25);
        inputs.withholdings.cedular_withheld = dec!(50);

        let summary = engine.calculate(&inputs);

        assert_eq!(summary.retentions_total, dec!(5616.92));
    }

    #[test]
    fn grand_total_is_sum_of_components() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);

        for regime in Regime::all() {
            let mut inputs = test_inputs(*regime);
            inputs.income_tax.advances = dec!(3333.33);
            inputs.income_tax.prior_provisional_payments = dec!(777.77);
            inputs.vat.import_vat = dec!(123.45);
            inputs.payroll.salary = dec!(12345.67);
            inputs.payroll.overtime = dec!(890.12);
            inputs.withholdings.cedular_withheld = dec!(42.42);

            let s = engine.calculate(&inputs);

            assert_eq!(
                s.grand_total,
                s.isr_due + s.iva_due + s.isn_due + s.retentions_total,
                "regime {regime:?}"
            );
        }
    }

    #[test]
    fn summary_fields_are_never_negative() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let mut inputs = test_inputs(Regime::Simplified);
        inputs.income_tax.prior_provisional_payments = dec!(999999);
        inputs.vat.prior_vat_credit = dec!(999999);

        let s = engine.calculate(&inputs);

        assert_eq!(s.isr_due, dec!(0));
        assert_eq!(s.iva_due, dec!(0));
        assert_eq!(s.grand_total, dec!(0));
    }

    #[test]
    fn zero_inputs_produce_zero_summary() {
        let table = default_table();
        let engine = FiscalSummaryEngine::new(FiscalRates::default(), &table);
        let inputs = FiscalInputs::new(Client::general(), Period::Ene, Regime::Individual);

        assert_eq!(engine.calculate(&inputs), FiscalSummary::default());
    }
}
