//! Progressive income tax from a bracket table.
//!
//! Each bracket carries an inclusive lower limit, a fixed quota owed on
//! everything below that limit, and a marginal rate in percent applied to
//! the excess. A base falls in the bracket with the greatest lower limit
//! that does not exceed it, so every bracket covers `[lower, next.lower)`.
//!
//! The calculator fails soft: an empty table, a negative base, or a base
//! below the first bracket all produce zero tax instead of an error.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fiscal_core::calculations::BracketTaxCalculator;
//! use fiscal_core::{TaxBracket, TaxBracketTable};
//!
//! let table = TaxBracketTable::new(vec![
//!     TaxBracket::new(dec!(0.01), dec!(0.00), dec!(1.92)),
//!     TaxBracket::new(dec!(7735.01), dec!(148.51), dec!(6.40)),
//!     TaxBracket::new(dec!(65651.08), dec!(3855.14), dec!(10.88)),
//! ]);
//!
//! let calculator = BracketTaxCalculator::new(&table);
//!
//! assert_eq!(calculator.compute(dec!(7735.01)), dec!(148.51));
//! assert_eq!(calculator.compute(dec!(80000)), dec!(5416.30));
//! assert_eq!(calculator.compute(dec!(0)), dec!(0));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{percent_to_fraction, round_half_up};
use crate::{TaxBracket, TaxBracketTable};

/// Looks up and applies brackets from a borrowed table.
#[derive(Debug, Clone, Copy)]
pub struct BracketTaxCalculator<'a> {
    table: &'a TaxBracketTable,
}

impl<'a> BracketTaxCalculator<'a> {
    pub fn new(table: &'a TaxBracketTable) -> Self {
        Self { table }
    }

    /// Tax owed on `base`, rounded to cents.
    ///
    /// Returns zero when no bracket applies.
    pub fn compute(
        &self,
        base: Decimal,
    ) -> Decimal {
        if base < Decimal::ZERO {
            debug!(%base, "negative base, no bracket tax");
            return Decimal::ZERO;
        }

        let Some(bracket) = self.matching_bracket(base) else {
            debug!(%base, brackets = self.table.len(), "base below every bracket");
            return Decimal::ZERO;
        };

        let excess = base - bracket.lower_bound;
        round_half_up(excess * percent_to_fraction(bracket.rate_percent) + bracket.fixed_quota)
    }

    /// The last bracket whose lower bound is at or below `base`.
    pub fn matching_bracket(
        &self,
        base: Decimal,
    ) -> Option<&'a TaxBracket> {
        let mut matched = None;
        for bracket in self.table.brackets() {
            if bracket.lower_bound > base {
                break;
            }
            matched = Some(bracket);
        }
        matched
    }
}
