use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Capability for supplying random bytes, injected wherever the core needs
/// randomness. UETR generation is the only place randomness enters the
/// core; everything else is pure transformation of caller-supplied data.
pub trait RandomBytes {
    fn fill(&mut self, buf: &mut [u8]);
}

/// `rand`-backed default implementation of [`RandomBytes`].
#[derive(Debug, Default)]
pub struct OsRandomBytes;

impl RandomBytes for OsRandomBytes {
    fn fill(&mut self, buf: &mut [u8]) {
        use rand::RngCore;
        rand::thread_rng().fill_bytes(buf);
    }
}

/// End-to-end/transaction identification, including the mandatory UETR
/// (Unique End-to-end Transaction Reference) carried on MT103/202 block 3
/// tag 121 and pain `PmtId/UETR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PaymentIdentification {
    pub instruction_id: Option<String>,
    pub end_to_end_id: String,
    pub uetr: String,
}

impl PaymentIdentification {
    pub fn new(end_to_end_id: impl Into<String>, source: &mut dyn RandomBytes) -> Self {
        PaymentIdentification {
            instruction_id: None,
            end_to_end_id: end_to_end_id.into(),
            uetr: generate_uetr(source),
        }
    }

    pub fn with_uetr(end_to_end_id: impl Into<String>, uetr: impl Into<String>) -> Result<Self, ParseError> {
        let uetr = uetr.into();
        validate_uetr(&uetr)?;
        Ok(PaymentIdentification {
            instruction_id: None,
            end_to_end_id: end_to_end_id.into(),
            uetr,
        })
    }
}

/// Generates an RFC 4122 version-4 UUID from 16 random bytes, setting the
/// version nibble to `4` and the variant bits to `10` per the RFC's byte
/// layout before formatting as the canonical 8-4-4-4-12 hex string.
pub fn generate_uetr(source: &mut dyn RandomBytes) -> String {
    let mut bytes = [0u8; 16];
    source.fill(&mut bytes);
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    let uuid = uuid::Builder::from_bytes(bytes)
        .with_version(uuid::Version::Random)
        .with_variant(uuid::Variant::RFC4122)
        .into_uuid();
    uuid.to_string()
}

/// Validates the well-formedness of a UETR string: 36-character canonical
/// UUID form with version nibble 4.
pub fn validate_uetr(uetr: &str) -> Result<(), ParseError> {
    let parsed = uuid::Uuid::parse_str(uetr)
        .map_err(|e| ParseError::invalid_value("uetr", e.to_string()))?;
    if parsed.get_version_num() != 4 {
        return Err(ParseError::invalid_value(
            "uetr",
            format!("'{uetr}' is not a version-4 UUID"),
        ));
    }
    Ok(())
}
