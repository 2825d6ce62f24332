use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// camt `Ntry/Sts/Cd` — whether an entry is finally booked or still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum EntryStatus {
    Booked,
    Pending,
}

impl EntryStatus {
    pub fn as_iso_str(&self) -> &'static str {
        match self {
            EntryStatus::Booked => "BOOK",
            EntryStatus::Pending => "PDNG",
        }
    }

    pub fn parse_iso_str(value: &str) -> Result<Self, ParseError> {
        match value {
            "BOOK" => Ok(EntryStatus::Booked),
            "PDNG" => Ok(EntryStatus::Pending),
            other => Err(ParseError::invalid_value(
                "Ntry/Sts",
                format!("'{other}' is not BOOK or PDNG"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_booked() {
        assert_eq!(EntryStatus::parse_iso_str("BOOK").unwrap(), EntryStatus::Booked);
        assert_eq!(EntryStatus::Booked.as_iso_str(), "BOOK");
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(EntryStatus::parse_iso_str("XYZZ").is_err());
    }
}
