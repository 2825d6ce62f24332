use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// ISO 20022 cash management (`camt.*`) message types this engine
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum CamtType {
    /// camt.053 — Bank to Customer Statement.
    Camt053,
    /// camt.052 — Bank to Customer Account Report.
    Camt052,
    /// camt.054 — Bank to Customer Debit Credit Notification.
    Camt054,
}

impl CamtType {
    pub fn message_number(&self) -> &'static str {
        match self {
            CamtType::Camt053 => "053",
            CamtType::Camt052 => "052",
            CamtType::Camt054 => "054",
        }
    }

    /// Detects the camt type from the root document's XML namespace URI,
    /// e.g. `urn:iso:std:iso:20022:tech:xsd:camt.053.001.08`. Detection
    /// keys exclusively on the namespace, never on element names or text
    /// content elsewhere in the tree — a `camt.054` notification whose body
    /// happens to reference `GrpHdr`/`Stmt` text must not be mistaken for a
    /// `camt.053` statement.
    pub fn from_namespace(namespace: &str) -> Result<Self, ParseError> {
        static RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"camt\.(\d{3})\.001\.\d{2}$").unwrap());
        let caps = RE
            .captures(namespace)
            .ok_or_else(|| ParseError::UnknownType(format!("not a camt namespace: {namespace}")))?;
        match &caps[1] {
            "053" => Ok(CamtType::Camt053),
            "052" => Ok(CamtType::Camt052),
            "054" => Ok(CamtType::Camt054),
            other => Err(ParseError::UnknownType(format!("camt.{other}"))),
        }
    }

    pub fn from_xml(document_xml: &str) -> Result<Self, ParseError> {
        let namespace = extract_root_namespace(document_xml)?;
        Self::from_namespace(&namespace)
    }
}

impl fmt::Display for CamtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camt.{}", self.message_number())
    }
}

/// Pulls the `xmlns=...` (or `xmlns:ns0=...`) value off the document's root
/// `Document` element, without a full parse — the version resolver only
/// needs the namespace, not the payload.
pub(crate) fn extract_root_namespace(xml: &str) -> Result<String, ParseError> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"xmlns(?::\w+)?="(urn:iso:std:iso:20022:tech:xsd:[^"]+)""#).unwrap()
    });
    RE.captures(xml)
        .map(|c| c[1].to_string())
        .ok_or_else(|| ParseError::Lex("no ISO 20022 namespace declaration found".into()))
}
