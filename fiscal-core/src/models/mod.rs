mod client;
mod fiscal_inputs;
mod fiscal_rates;
mod fiscal_summary;
mod period;
mod regime;
mod tax_bracket;

pub use client::{Client, GENERAL_CLIENT, InvalidRfc, UNNAMED_CLIENT};
pub use fiscal_inputs::{
    FiscalInputs, IncomeTaxInputs, PayrollInputs, ThirdPartyWithholdings, VatInputs,
};
pub use fiscal_rates::{FiscalRates, FiscalRatesError};
pub use fiscal_summary::FiscalSummary;
pub use period::Period;
pub use regime::Regime;
pub use tax_bracket::{TaxBracket, TaxBracketTable};
