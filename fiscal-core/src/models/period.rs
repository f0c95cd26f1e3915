use serde::{Deserialize, Serialize};

/// Monthly filing period, tagged with the Spanish month abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    Ene,
    Feb,
    Mar,
    Abr,
    May,
    Jun,
    Jul,
    Ago,
    Sep,
    Oct,
    Nov,
    Dic,
}

impl Period {
    pub fn all() -> &'static [Period] {
        &[
            Period::Ene,
            Period::Feb,
            Period::Mar,
            Period::Abr,
            Period::May,
            Period::Jun,
            Period::Jul,
            Period::Ago,
            Period::Sep,
            Period::Oct,
            Period::Nov,
            Period::Dic,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ene => "ENE",
            Self::Feb => "FEB",
            Self::Mar => "MAR",
            Self::Abr => "ABR",
            Self::May => "MAY",
            Self::Jun => "JUN",
            Self::Jul => "JUL",
            Self::Ago => "AGO",
            Self::Sep => "SEP",
            Self::Oct => "OCT",
            Self::Nov => "NOV",
            Self::Dic => "DIC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_uppercase();
        Self::all().iter().copied().find(|p| p.as_str() == needle)
    }
}

impl std::fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
