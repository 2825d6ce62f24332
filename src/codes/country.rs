use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// ISO 3166-1 alpha-2 country code, closed over the SEPA zone plus major
/// trade partners, with an `Other` fallback for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum CountryCode {
    De,
    Fr,
    It,
    Es,
    Nl,
    Be,
    At,
    Ch,
    Gb,
    Us,
    Pl,
    Other(String),
}

impl CountryCode {
    pub fn code(&self) -> &str {
        match self {
            CountryCode::De => "DE",
            CountryCode::Fr => "FR",
            CountryCode::It => "IT",
            CountryCode::Es => "ES",
            CountryCode::Nl => "NL",
            CountryCode::Be => "BE",
            CountryCode::At => "AT",
            CountryCode::Ch => "CH",
            CountryCode::Gb => "GB",
            CountryCode::Us => "US",
            CountryCode::Pl => "PL",
            CountryCode::Other(code) => code,
        }
    }
}

impl FromStr for CountryCode {
    type Err = ParseError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ParseError::invalid_value(
                "country",
                format!("'{code}' is not a 2-letter uppercase ISO 3166-1 code"),
            ));
        }
        Ok(match code {
            "DE" => CountryCode::De,
            "FR" => CountryCode::Fr,
            "IT" => CountryCode::It,
            "ES" => CountryCode::Es,
            "NL" => CountryCode::Nl,
            "BE" => CountryCode::Be,
            "AT" => CountryCode::At,
            "CH" => CountryCode::Ch,
            "GB" => CountryCode::Gb,
            "US" => CountryCode::Us,
            "PL" => CountryCode::Pl,
            other => CountryCode::Other(other.to_string()),
        })
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_country() {
        assert_eq!("DE".parse::<CountryCode>().unwrap(), CountryCode::De);
    }

    #[test]
    fn falls_back_for_unlisted_country() {
        assert_eq!(
            "JP".parse::<CountryCode>().unwrap(),
            CountryCode::Other("JP".into())
        );
    }
}
