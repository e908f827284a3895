//! ElementType enum representing the closed set of assurance case element kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// The kinds of element that can appear in an assurance case tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    Goal,
    Context,
    Strategy,
    PropertyClaim,
    Evidence,
    Justification,
    Assumption,
    Module,
    AwayGoal,
    Contract,
}

impl ElementType {
    /// Returns all element types in canonical order.
    pub fn all() -> &'static [ElementType] {
        &[
            ElementType::Goal,
            ElementType::Context,
            ElementType::Strategy,
            ElementType::PropertyClaim,
            ElementType::Evidence,
            ElementType::Justification,
            ElementType::Assumption,
            ElementType::Module,
            ElementType::AwayGoal,
            ElementType::Contract,
        ]
    }

    /// Returns the human-readable label used in element titles.
    pub fn label(&self) -> &'static str {
        match self {
            ElementType::Goal => "Goal",
            ElementType::Context => "Context",
            ElementType::Strategy => "Strategy",
            ElementType::PropertyClaim => "Property Claim",
            ElementType::Evidence => "Evidence",
            ElementType::Justification => "Justification",
            ElementType::Assumption => "Assumption",
            ElementType::Module => "Module",
            ElementType::AwayGoal => "Away Goal",
            ElementType::Contract => "Contract",
        }
    }

    /// Plural label used for section headings and summary tables.
    pub fn plural_label(&self) -> &'static str {
        match self {
            ElementType::Goal => "Goals",
            ElementType::Context => "Contexts",
            ElementType::Strategy => "Strategies",
            ElementType::PropertyClaim => "Property Claims",
            ElementType::Evidence => "Evidence",
            ElementType::Justification => "Justifications",
            ElementType::Assumption => "Assumptions",
            ElementType::Module => "Modules",
            ElementType::AwayGoal => "Away Goals",
            ElementType::Contract => "Contracts",
        }
    }

    /// Returns the wire identifier (e.g. `PROPERTY_CLAIM`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Goal => "GOAL",
            ElementType::Context => "CONTEXT",
            ElementType::Strategy => "STRATEGY",
            ElementType::PropertyClaim => "PROPERTY_CLAIM",
            ElementType::Evidence => "EVIDENCE",
            ElementType::Justification => "JUSTIFICATION",
            ElementType::Assumption => "ASSUMPTION",
            ElementType::Module => "MODULE",
            ElementType::AwayGoal => "AWAY_GOAL",
            ElementType::Contract => "CONTRACT",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ElementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ValidationError::invalid_format("element type", format!("unknown type '{}'", s))
            })
    }
}
