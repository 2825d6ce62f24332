use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// ISO 20022 `GrpHdr`: message-level identification shared by every
/// pain/camt document (message id, creation time, and the control
/// counts/sums used for reconciliation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GroupHeader {
    pub message_id: String,
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub creation_date_time: DateTime<FixedOffset>,
    pub number_of_transactions: u32,
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub control_sum: Option<rust_decimal::Decimal>,
}

impl GroupHeader {
    pub fn new(message_id: impl Into<String>, creation_date_time: DateTime<FixedOffset>) -> Self {
        GroupHeader {
            message_id: message_id.into(),
            creation_date_time,
            number_of_transactions: 0,
            control_sum: None,
        }
    }
}
