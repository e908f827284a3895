//! Branding - visual identity applied uniformly across export formats.
//!
//! Callers supply a partial [`Branding`]; [`resolve_branding`] merges it over
//! the system defaults into a total [`ResolvedBranding`], so exporters never
//! null-check a branding field.

mod logo;

pub use logo::LogoSource;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::HexColor;

/// Default primary colour (deep blue).
pub const DEFAULT_PRIMARY_COLOR: HexColor = HexColor::rgb(0x1E, 0x3A, 0x8A);

/// Default secondary colour (slate).
pub const DEFAULT_SECONDARY_COLOR: HexColor = HexColor::rgb(0x64, 0x74, 0x8B);

/// Default footer text.
pub const DEFAULT_FOOTER_TEXT: &str = "Generated from an assurance case export";

/// Default font family.
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

static DEFAULT_BRANDING: Lazy<ResolvedBranding> = Lazy::new(|| ResolvedBranding {
    primary_color: DEFAULT_PRIMARY_COLOR,
    secondary_color: DEFAULT_SECONDARY_COLOR,
    logo: None,
    organisation_name: None,
    footer_text: DEFAULT_FOOTER_TEXT.to_string(),
    font_family: DEFAULT_FONT_FAMILY.to_string(),
});

/// Partial branding override; any field left `None` falls back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Branding {
    #[serde(default)]
    pub primary_color: Option<HexColor>,
    #[serde(default)]
    pub secondary_color: Option<HexColor>,
    #[serde(default)]
    pub logo: Option<LogoSource>,
    #[serde(default)]
    pub organisation_name: Option<String>,
    #[serde(default)]
    pub footer_text: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
}

impl Branding {
    /// Layers `overrides` on top of `self`; present override fields win.
    pub fn merged_with(&self, overrides: &Branding) -> Branding {
        Branding {
            primary_color: overrides.primary_color.or(self.primary_color),
            secondary_color: overrides.secondary_color.or(self.secondary_color),
            logo: overrides.logo.clone().or_else(|| self.logo.clone()),
            organisation_name: overrides
                .organisation_name
                .clone()
                .or_else(|| self.organisation_name.clone()),
            footer_text: overrides
                .footer_text
                .clone()
                .or_else(|| self.footer_text.clone()),
            font_family: overrides
                .font_family
                .clone()
                .or_else(|| self.font_family.clone()),
        }
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Branding::default()
    }
}

/// Fully-populated branding consumed by exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBranding {
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub logo: Option<LogoSource>,
    pub organisation_name: Option<String>,
    pub footer_text: String,
    pub font_family: String,
}

impl Default for ResolvedBranding {
    fn default() -> Self {
        DEFAULT_BRANDING.clone()
    }
}

/// Merges a partial override with the system defaults.
///
/// Blank strings in the override are treated as absent.
pub fn resolve_branding(overrides: Option<&Branding>) -> ResolvedBranding {
    let defaults = &*DEFAULT_BRANDING;
    let Some(overrides) = overrides else {
        return defaults.clone();
    };

    let non_blank = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    ResolvedBranding {
        primary_color: overrides.primary_color.unwrap_or(defaults.primary_color),
        secondary_color: overrides.secondary_color.unwrap_or(defaults.secondary_color),
        logo: overrides.logo.clone().or_else(|| defaults.logo.clone()),
        organisation_name: non_blank(&overrides.organisation_name)
            .or_else(|| defaults.organisation_name.clone()),
        footer_text: non_blank(&overrides.footer_text)
            .unwrap_or_else(|| defaults.footer_text.clone()),
        font_family: non_blank(&overrides.font_family)
            .unwrap_or_else(|| defaults.font_family.clone()),
    }
}
