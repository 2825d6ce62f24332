use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codes::camt_type::extract_root_namespace;
use crate::error::ParseError;

/// ISO 20022 payments initiation (`pain.*`) message types this engine
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PainType {
    /// pain.001 — Customer Credit Transfer Initiation.
    Pain001,
    /// pain.002 — Customer Payment Status Report.
    Pain002,
    /// pain.008 — Customer Direct Debit Initiation.
    Pain008,
}

impl PainType {
    pub fn message_number(&self) -> &'static str {
        match self {
            PainType::Pain001 => "001",
            PainType::Pain002 => "002",
            PainType::Pain008 => "008",
        }
    }

    /// Detects the pain type from the root namespace, same discipline as
    /// `CamtType::from_namespace`: a pain.002 status report whose rejected
    /// transaction echoes a pain.008 `OrgnlMsgNmId` string in its payload
    /// must still resolve as pain.002, because detection never inspects
    /// element content.
    pub fn from_namespace(namespace: &str) -> Result<Self, ParseError> {
        static RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"pain\.(\d{3})\.001\.\d{2}$").unwrap());
        let caps = RE
            .captures(namespace)
            .ok_or_else(|| ParseError::UnknownType(format!("not a pain namespace: {namespace}")))?;
        match &caps[1] {
            "001" => Ok(PainType::Pain001),
            "002" => Ok(PainType::Pain002),
            "008" => Ok(PainType::Pain008),
            other => Err(ParseError::UnknownType(format!("pain.{other}"))),
        }
    }

    pub fn from_xml(document_xml: &str) -> Result<Self, ParseError> {
        let namespace = extract_root_namespace(document_xml)?;
        Self::from_namespace(&namespace)
    }
}

impl fmt::Display for PainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pain.{}", self.message_number())
    }
}
