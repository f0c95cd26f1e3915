use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a progressive tax table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower limit of the bracket.
    pub lower_bound: Decimal,
    /// Tax owed on income up to `lower_bound`.
    pub fixed_quota: Decimal,
    /// Marginal rate over the excess, in percent (e.g. `10.88`).
    pub rate_percent: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        fixed_quota: Decimal,
        rate_percent: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            fixed_quota,
            rate_percent,
        }
    }
}

/// Brackets ordered ascending by `lower_bound`.
///
/// The constructor sorts its input, so a table is always safe to scan with
/// an early exit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    pub fn new(mut brackets: Vec<TaxBracket>) -> Self {
        brackets.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

impl From<Vec<TaxBracket>> for TaxBracketTable {
    fn from(brackets: Vec<TaxBracket>) -> Self {
        Self::new(brackets)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_sorts_by_lower_bound() {
        let table = TaxBracketTable::new(vec![
            TaxBracket::new(dec!(7735.01), dec!(148.51), dec!(6.40)),
            TaxBracket::new(dec!(0.01), dec!(0.00), dec!(1.92)),
        ]);

        assert_eq!(table.brackets()[0].lower_bound, dec!(0.01));
        assert_eq!(table.brackets()[1].lower_bound, dec!(7735.01));
    }

    #[test]
    fn empty_table() {
        let table = TaxBracketTable::default();

        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
