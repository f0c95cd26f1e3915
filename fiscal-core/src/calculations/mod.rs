//! Tax calculations: bracket ISR, the monthly fiscal summary, and the annual
//! estimate.

pub mod annual;
pub mod bracket;
pub mod common;
pub mod summary;

pub use annual::{AnnualEstimate, AnnualEstimator, AnnualInputs};
pub use bracket::BracketTaxCalculator;
pub use summary::FiscalSummaryEngine;
