//! Session state for one logged-in user.
//!
//! The session is owned by the caller and passed explicitly to each command
//! handler. It remembers who is working (the report author) and the most
//! recent calculation.

use std::collections::BTreeMap;

use fiscal_core::calculations::FiscalSummaryEngine;
use fiscal_core::report::render_summary;
use fiscal_core::{FiscalInputs, FiscalSummary};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Usuario o contraseña incorrectos")]
pub struct LoginError;

/// One finished calculation: what went in, what came out, and the text
/// report built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub inputs: FiscalInputs,
    pub summary: FiscalSummary,
    pub report: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    user: String,
    last: Option<Calculation>,
}

impl Session {
    /// Checks `user` / `password` against the configured users.
    ///
    /// With no users configured any non-blank name is accepted.
    pub fn login(
        users: &BTreeMap<String, String>,
        user: &str,
        password: Option<&str>,
    ) -> Result<Self, LoginError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(LoginError);
        }

        if users.is_empty() {
            warn!(user, "no users configured, accepting login without a password check");
        } else if users.get(user).map(String::as_str) != Some(password.unwrap_or_default()) {
            warn!(user, "login rejected");
            return Err(LoginError);
        }

        info!(user, "logged in");
        Ok(Self {
            user: user.to_string(),
            last: None,
        })
    }

    /// Name printed on reports as the author.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Runs one calculation, renders its report and keeps it as the latest.
    pub fn calculate(
        &mut self,
        engine: &FiscalSummaryEngine<'_>,
        inputs: FiscalInputs,
    ) -> &Calculation {
        let summary = engine.calculate(&inputs);
        let report = render_summary(&inputs, &summary, engine.rates(), &self.user);
        info!(
            client = %inputs.client.display_name(),
            period = %inputs.period,
            total = %summary.grand_total,
            "calculation complete"
        );

        self.last.insert(Calculation {
            inputs,
            summary,
            report,
        })
    }

    pub fn last_summary(&self) -> Option<&FiscalSummary> {
        self.last.as_ref().map(|c| &c.summary)
    }
}
