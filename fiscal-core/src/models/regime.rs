use serde::{Deserialize, Serialize};

/// Taxpayer classification that decides which ISR formula applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Corporate general regime: flat rate over the profit coefficient.
    General,
    /// Simplified corporate regime (RESICO PM): flat rate over net cash flow.
    Simplified,
    /// Individual: progressive tax from the bracket table.
    Individual,
}

impl Regime {
    pub fn all() -> &'static [Regime] {
        &[Regime::General, Regime::Simplified, Regime::Individual]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Simplified => "RESICO",
            Self::Individual => "PF",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "RÉGIMEN GENERAL PM",
            Self::Simplified => "RESICO PM",
            Self::Individual => "PERSONA FÍSICA",
        }
    }

    /// Accepts either the short code or the full label, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == needle || r.label() == needle)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_codes() {
        assert_eq!(Regime::parse("GENERAL"), Some(Regime::General));
        assert_eq!(Regime::parse("RESICO"), Some(Regime::Simplified));
        assert_eq!(Regime::parse("PF"), Some(Regime::Individual));
    }

    #[test]
    fn parse_accepts_labels_and_lowercase() {
        assert_eq!(Regime::parse("RESICO PM"), Some(Regime::Simplified));
        assert_eq!(Regime::parse("persona física"), Some(Regime::Individual));
        assert_eq!(Regime::parse("  general "), Some(Regime::General));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Regime::parse("MFJ"), None);
        assert_eq!(Regime::parse(""), None);
    }
}
