use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// SEPA direct debit mandate reference, carried in `:86:` `MREF` and pain.008
/// `MndtId`/`DtOfSgntr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Mandate {
    pub mandate_id: String,
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub date_of_signature: Option<NaiveDate>,
    pub creditor_id: Option<String>,
}
