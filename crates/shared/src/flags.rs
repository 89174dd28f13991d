use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FlagConfigError;
use crate::models::{FlagRule, Year};

/// URL prefix under which flag icons are served.
pub const FLAG_ICON_DIR: &str = "/static/flags";

/// Path of a flag icon as served by the backend.
pub fn icon_url(icon: &str) -> String {
    format!("{}/{}", FLAG_ICON_DIR, icon.trim_start_matches('/'))
}

/// Per-empire ordered flag rules, as read from `flags.json`:
///
/// ```json
/// { "Dutch": [{ "from": 1600, "to": 1650, "icon": "voc.png" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagConfig {
    empires: BTreeMap<String, Vec<FlagRule>>,
}

impl FlagConfig {
    pub fn new(empires: BTreeMap<String, Vec<FlagRule>>) -> Self {
        Self { empires }
    }

    /// Parse and validate a JSON flag configuration.
    pub fn from_json(text: &str) -> Result<Self, FlagConfigError> {
        let config: FlagConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty intervals and overlapping rules within an empire.
    ///
    /// Resolution scans rules in order and takes the first match, so an
    /// overlap would make the result depend on file order.
    pub fn validate(&self) -> Result<(), FlagConfigError> {
        for (empire, rules) in &self.empires {
            if let Some(rule) = rules.iter().find(|r| r.from >= r.to) {
                return Err(FlagConfigError::EmptyInterval {
                    empire: empire.clone(),
                    from: rule.from,
                    to: rule.to,
                });
            }

            let mut sorted: Vec<&FlagRule> = rules.iter().collect();
            sorted.sort_by_key(|r| r.from);
            for pair in sorted.windows(2) {
                if pair[0].overlaps(pair[1]) {
                    return Err(FlagConfigError::Overlap {
                        empire: empire.clone(),
                        first: pair[0].clone(),
                        second: pair[1].clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Rules for an empire in configuration order; empty when unknown.
    pub fn rules(&self, empire: &str) -> &[FlagRule] {
        self.empires.get(empire).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn empires(&self) -> impl Iterator<Item = &str> {
        self.empires.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.empires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.empires.is_empty()
    }

    /// Icon of the first rule whose `[from, to)` contains `year`.
    /// Unknown empires and uncovered years resolve to `None`.
    pub fn resolve(&self, empire: &str, year: Year) -> Option<&str> {
        self.rules(empire)
            .iter()
            .find(|rule| rule.contains(year))
            .map(|rule| rule.icon.as_str())
    }

    /// Like [`resolve`](Self::resolve), falling back to the empire's first
    /// rule when no interval covers `year`. Used for both map markers and the
    /// filter panel preview.
    pub fn resolve_or_first(&self, empire: &str, year: Year) -> Option<&str> {
        self.resolve(empire, year)
            .or_else(|| self.rules(empire).first().map(|rule| rule.icon.as_str()))
    }
}
