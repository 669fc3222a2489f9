//! Commodity identifiers and the resolver that maps exchange symbols or
//! free-text contract names onto them.

use crate::core::locale::Locale;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::LazyLock;

/// Contract label used when a source does not report the delivery month.
pub const DEFAULT_CONTRACT_LABEL: &str = "Mar '26";

static CONTRACT_SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z]{2,4}[FGHJKMNQUVXZ]\d{2}").expect("valid contract symbol pattern")
});

static CONTRACT_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z]{3})\s*'?\s*(\d{2})").expect("valid contract month pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commodity {
    Corn,
    Wheat,
    Soybeans,
}

/// A front-month contract the site tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedContract {
    pub symbol: &'static str,
    pub commodity: Commodity,
    pub contract_label: &'static str,
}

pub const TRACKED_CONTRACTS: [TrackedContract; 3] = [
    TrackedContract {
        symbol: "ZCH26",
        commodity: Commodity::Corn,
        contract_label: DEFAULT_CONTRACT_LABEL,
    },
    TrackedContract {
        symbol: "ZWH26",
        commodity: Commodity::Wheat,
        contract_label: DEFAULT_CONTRACT_LABEL,
    },
    TrackedContract {
        symbol: "ZSH26",
        commodity: Commodity::Soybeans,
        contract_label: DEFAULT_CONTRACT_LABEL,
    },
];

impl Commodity {
    pub const ALL: [Commodity; 3] = [Commodity::Corn, Commodity::Wheat, Commodity::Soybeans];

    // Lowercase fragments; Bulgarian stems cover declined forms.
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Commodity::Corn => &["corn", "maize", "царев"],
            Commodity::Wheat => &["wheat", "пшени"],
            Commodity::Soybeans => &["soy", "соя", "соев"],
        }
    }

    /// Exact lookup against the tracked front-month symbols.
    pub fn from_symbol(symbol: &str) -> Option<Commodity> {
        TRACKED_CONTRACTS
            .iter()
            .find(|c| c.symbol == symbol)
            .map(|c| c.commodity)
    }

    /// Case-insensitive keyword match against a contract or product name.
    pub fn from_name(name: &str) -> Option<Commodity> {
        let normalized = name.to_lowercase();
        Commodity::ALL
            .into_iter()
            .find(|c| c.keywords().iter().any(|k| normalized.contains(k)))
    }

    /// Symbol lookup first, then the name keywords. First match wins.
    pub fn resolve(symbol: Option<&str>, name: Option<&str>) -> Option<Commodity> {
        symbol
            .and_then(Commodity::from_symbol)
            .or_else(|| name.and_then(Commodity::from_name))
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Commodity::Corn, Locale::En) => "Corn",
            (Commodity::Corn, Locale::Bg) => "Царевица",
            (Commodity::Wheat, Locale::En) => "Wheat",
            (Commodity::Wheat, Locale::Bg) => "Пшеница",
            (Commodity::Soybeans, Locale::En) => "Soybeans",
            (Commodity::Soybeans, Locale::Bg) => "Соя",
        }
    }
}

impl Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Commodity::Corn => "corn",
                Commodity::Wheat => "wheat",
                Commodity::Soybeans => "soybeans",
            }
        )
    }
}

/// Pulls an exchange symbol such as `ZCH26` out of a contract cell like
/// `"Corn Mar '26 (ZCH26)"`, or returns `fallback`.
pub fn extract_contract_symbol(cell: Option<&str>, fallback: &str) -> String {
    cell.and_then(|c| CONTRACT_SYMBOL_PATTERN.find(c))
        .map_or_else(|| fallback.to_string(), |m| m.as_str().to_string())
}

/// Normalizes a contract cell to the `Mon 'YY` label.
pub fn normalize_contract_month(cell: Option<&str>) -> String {
    cell.and_then(|c| CONTRACT_MONTH_PATTERN.captures(c))
        .map_or_else(
            || DEFAULT_CONTRACT_LABEL.to_string(),
            |caps| format!("{} '{}", &caps[1], &caps[2]),
        )
}
