use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// ISO 4217 currency code. The common SEPA/G10/CEE currencies are closed
/// variants so callers get exhaustive `match` ergonomics for the currencies
/// that actually appear in the worked examples; everything else round-trips
/// through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
    Chf,
    Jpy,
    Cad,
    Aud,
    Sek,
    Nok,
    Dkk,
    Pln,
    Czk,
    Huf,
    Ron,
    Other(String),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Chf => "CHF",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Sek => "SEK",
            Currency::Nok => "NOK",
            Currency::Dkk => "DKK",
            Currency::Pln => "PLN",
            Currency::Czk => "CZK",
            Currency::Huf => "HUF",
            Currency::Ron => "RON",
            Currency::Other(code) => code,
        }
    }

    /// Minor unit exponent used to validate amount precision (e.g. JPY has
    /// no decimal places; most others have two).
    pub fn minor_unit_exponent(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = ParseError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ParseError::invalid_value(
                "currency",
                format!("'{code}' is not a 3-letter uppercase ISO 4217 code"),
            ));
        }
        Ok(match code {
            "EUR" => Currency::Eur,
            "USD" => Currency::Usd,
            "GBP" => Currency::Gbp,
            "CHF" => Currency::Chf,
            "JPY" => Currency::Jpy,
            "CAD" => Currency::Cad,
            "AUD" => Currency::Aud,
            "SEK" => Currency::Sek,
            "NOK" => Currency::Nok,
            "DKK" => Currency::Dkk,
            "PLN" => Currency::Pln,
            "CZK" => Currency::Czk,
            "HUF" => Currency::Huf,
            "RON" => Currency::Ron,
            other => Currency::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
