use serde::{Deserialize, Serialize};
use std::fmt;

/// Fiat or crypto quote currency, stored lowercase as upstream expects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl AsRef<str>) -> Self {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Self::usd();
        }
        Self(code.to_lowercase())
    }

    pub fn usd() -> Self {
        Self(String::from("usd"))
    }

    /// Lowercase code used in `vs_currency` query parameters and map lookups.
    pub fn as_query(&self) -> &str {
        &self.0
    }

    /// Uppercase code for display.
    pub fn display_code(&self) -> String {
        self.0.to_uppercase()
    }

    pub fn is_usd(&self) -> bool {
        self.0 == "usd"
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_code())
    }
}
