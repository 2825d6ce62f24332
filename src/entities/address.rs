use serde::{Deserialize, Serialize};

use crate::codes::CountryCode;

/// A postal address, as carried by ISO 20022 `PstlAdr` blocks and by the
/// free-text lines of SWIFT field 50K/59 party blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PostalAddress {
    pub street_name: Option<String>,
    pub building_number: Option<String>,
    pub post_code: Option<String>,
    pub town_name: Option<String>,
    pub country: Option<CountryCode>,
    /// Unstructured address lines, used when the source (typically an MT
    /// party field) carries free text rather than structured components.
    pub address_lines: Vec<String>,
}

impl PostalAddress {
    pub fn from_lines(lines: Vec<String>) -> Self {
        PostalAddress {
            address_lines: lines,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.street_name.is_none()
            && self.building_number.is_none()
            && self.post_code.is_none()
            && self.town_name.is_none()
            && self.country.is_none()
            && self.address_lines.is_empty()
    }
}
