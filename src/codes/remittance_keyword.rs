use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// SEPA/GVC structured remittance keywords found in `:86:` lines, e.g.
/// `EREF+abc123 MREF+mandate-7 SVWZ+invoice 9921`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum RemittanceKeyword {
    /// End-to-end reference.
    Eref,
    /// Mandate reference.
    Mref,
    /// Unstructured remittance text ("Verwendungszweck").
    Svwz,
    /// Creditor identifier.
    Cred,
    /// Debtor identifier.
    Debt,
    /// Customer reference ("Kundenreferenz").
    Kref,
    /// Charge amount.
    Coam,
    /// Original amount.
    Oamt,
    /// Booking text.
    Book,
    /// Purpose code.
    Purp,
    /// Return reason.
    Rrsn,
    /// Deviating originator ("Abweichender Auftraggeber").
    Abwa,
    /// Deviating beneficiary ("Abweichender Empfänger").
    Abwe,
    Iban,
    Bic,
}

impl RemittanceKeyword {
    pub const ALL: [RemittanceKeyword; 15] = [
        RemittanceKeyword::Eref,
        RemittanceKeyword::Mref,
        RemittanceKeyword::Svwz,
        RemittanceKeyword::Cred,
        RemittanceKeyword::Debt,
        RemittanceKeyword::Kref,
        RemittanceKeyword::Coam,
        RemittanceKeyword::Oamt,
        RemittanceKeyword::Book,
        RemittanceKeyword::Purp,
        RemittanceKeyword::Rrsn,
        RemittanceKeyword::Abwa,
        RemittanceKeyword::Abwe,
        RemittanceKeyword::Iban,
        RemittanceKeyword::Bic,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            RemittanceKeyword::Eref => "EREF",
            RemittanceKeyword::Mref => "MREF",
            RemittanceKeyword::Svwz => "SVWZ",
            RemittanceKeyword::Cred => "CRED",
            RemittanceKeyword::Debt => "DEBT",
            RemittanceKeyword::Kref => "KREF",
            RemittanceKeyword::Coam => "COAM",
            RemittanceKeyword::Oamt => "OAMT",
            RemittanceKeyword::Book => "BOOK",
            RemittanceKeyword::Purp => "PURP",
            RemittanceKeyword::Rrsn => "RRSN",
            RemittanceKeyword::Abwa => "ABWA",
            RemittanceKeyword::Abwe => "ABWE",
            RemittanceKeyword::Iban => "IBAN",
            RemittanceKeyword::Bic => "BIC",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Splits a GVC-style `:86:` line (`KEY+value KEY+value ...`) into an
    /// ordered map of recognized keywords to their values. Unrecognized
    /// leading tokens are ignored; this is a best-effort decoder, not a
    /// validator.
    pub fn decode_line(line: &str) -> BTreeMap<RemittanceKeyword, String> {
        let mut map = BTreeMap::new();
        let mut current_key: Option<RemittanceKeyword> = None;
        let mut current_value = String::new();
        for token in line.split_whitespace() {
            if let Some((candidate, rest)) = token.split_once('+') {
                if let Some(keyword) = RemittanceKeyword::from_tag(candidate) {
                    if let Some(key) = current_key.take() {
                        map.insert(key, current_value.trim().to_string());
                    }
                    current_key = Some(keyword);
                    current_value = rest.to_string();
                    continue;
                }
            }
            if current_key.is_some() {
                current_value.push(' ');
                current_value.push_str(token);
            }
        }
        if let Some(key) = current_key {
            map.insert(key, current_value.trim().to_string());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_gvc_keywords() {
        let map = RemittanceKeyword::decode_line("EREF+E2E-REF-001 MREF+MANDATE-42 SVWZ+Invoice 9921 payment");
        assert_eq!(map.get(&RemittanceKeyword::Eref).unwrap(), "E2E-REF-001");
        assert_eq!(map.get(&RemittanceKeyword::Mref).unwrap(), "MANDATE-42");
        assert_eq!(
            map.get(&RemittanceKeyword::Svwz).unwrap(),
            "Invoice 9921 payment"
        );
    }

    #[test]
    fn unknown_tag_is_ignored() {
        let map = RemittanceKeyword::decode_line("ABWA+Someone Else XYZZ+ignored");
        assert_eq!(map.get(&RemittanceKeyword::Abwa).unwrap(), "Someone Else XYZZ+ignored");
    }
}
