use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codes::RemittanceKeyword;

/// Remittance information attached to a transaction: either unstructured
/// free text (SWIFT field 70/86, pain `Ustrd`) or a decoded set of
/// SEPA/GVC keyword pairs (`EREF`, `MREF`, `SVWZ`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RemittanceInformation {
    pub unstructured: Option<String>,
    pub structured: BTreeMap<RemittanceKeyword, String>,
}

impl RemittanceInformation {
    pub fn from_text(text: &str) -> Self {
        let structured = RemittanceKeyword::decode_line(text);
        let unstructured = if structured.is_empty() {
            Some(text.to_string())
        } else {
            None
        };
        RemittanceInformation {
            unstructured,
            structured,
        }
    }

    /// Splits unstructured remittance text into pain-compliant 140-Unicode-
    /// code-unit lines (not grapheme clusters — ISO 20022 `Ustrd` length
    /// limits are specified in characters/code points, and pain generators
    /// in the wild count UTF-16 code units; we use `char` count, which
    /// matches for the Latin-1/Latin-Extended text this format carries).
    pub fn split_into_lines(text: &str, max_code_units: usize) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(max_code_units)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}
