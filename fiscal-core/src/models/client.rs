use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name shown when no specific client is selected.
pub const GENERAL_CLIENT: &str = "CLIENTE GENERAL";

/// Name shown for a new client whose name was left blank.
pub const UNNAMED_CLIENT: &str = "SIN NOMBRE";

// Persona moral (3 letters) or persona física (4 letters), YYMMDD, 3-char homoclave.
static RFC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-ZÑ&]{3,4}[0-9]{6}[A-Z0-9]{3}$").expect("RFC pattern is a valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid RFC '{0}'")]
pub struct InvalidRfc(pub String);

/// The taxpayer a calculation is prepared for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub rfc: Option<String>,
}

impl Client {
    pub fn general() -> Self {
        Self {
            name: GENERAL_CLIENT.to_string(),
            rfc: None,
        }
    }

    pub fn new(
        name: impl Into<String>,
        rfc: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rfc: rfc.filter(|r| !r.trim().is_empty()),
        }
    }

    /// `Name (RFC)` when an RFC is present, `SIN NOMBRE` for a blank name.
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            return UNNAMED_CLIENT.to_string();
        }
        match &self.rfc {
            Some(rfc) => format!("{name} ({})", rfc.trim()),
            None => name.to_string(),
        }
    }

    /// Checks the RFC shape. A client without an RFC is always valid.
    pub fn validate_rfc(&self) -> Result<(), InvalidRfc> {
        match &self.rfc {
            Some(rfc) if !RFC_PATTERN.is_match(&rfc.trim().to_uppercase()) => {
                Err(InvalidRfc(rfc.clone()))
            }
            _ => Ok(()),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::general()
    }
}
