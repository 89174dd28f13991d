use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Calendar year. Negative years never occur in the data but are not rejected.
pub type Year = i32;

/// Empire names currently enabled in the filter panel.
pub type EmpireSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPost {
    pub name: String,
    #[serde(default)]
    pub alt_names: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub empire: String,
    pub start_year: Year,
    pub end_year: Year,
}

impl TradingPost {
    pub fn key(&self) -> PostKey {
        PostKey {
            name: self.name.clone(),
            empire: self.empire.clone(),
        }
    }

    /// Both bounds are inclusive.
    pub fn is_active_in(&self, year: Year) -> bool {
        self.start_year <= year && self.end_year >= year
    }

    pub fn is_visible(&self, year: Year, active: &EmpireSet) -> bool {
        self.is_active_in(year) && active.contains(&self.empire)
    }

    /// Human-readable active range, e.g. "1510 – 1600".
    pub fn period_label(&self) -> String {
        format!("{} – {}", self.start_year, self.end_year)
    }
}

/// Stable identity of a trading post across renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostKey {
    pub name: String,
    pub empire: String,
}

impl std::fmt::Display for PostKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.empire)
    }
}

/// A flag icon valid over the half-open interval `[from, to)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRule {
    pub from: Year,
    pub to: Year,
    pub icon: String,
}

impl FlagRule {
    pub fn contains(&self, year: Year) -> bool {
        year >= self.from && year < self.to
    }

    pub fn overlaps(&self, other: &FlagRule) -> bool {
        self.from < other.to && other.from < self.to
    }
}
