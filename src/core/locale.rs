use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Display languages supported by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Bg,
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Locale::En => "en",
                Locale::Bg => "bg",
            }
        )
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "bg" => Ok(Locale::Bg),
            _ => Err(anyhow::anyhow!("Unsupported locale: {}", s)),
        }
    }
}
