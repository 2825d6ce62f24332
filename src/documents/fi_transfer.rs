use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::institution::FinancialInstitutionIdentification;
use crate::entities::money::Money;
use crate::entities::payment_id::PaymentIdentification;
use crate::error::ValidationReport;

/// The payload of MT200 (transfer for the sender's own account) and
/// MT202/MT202COV (general financial institution transfer, optionally
/// carrying underlying customer credit transfer details for a cover
/// payment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FinancialInstitutionTransferDocument {
    pub payment_id: PaymentIdentification,
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub value_date: NaiveDate,
    pub amount: Money,
    pub ordering_institution: Option<FinancialInstitutionIdentification>,
    pub beneficiary_institution: FinancialInstitutionIdentification,
    pub intermediary_institution: Option<FinancialInstitutionIdentification>,
    /// Present only for MT202COV: the underlying customer credit transfer
    /// this cover payment settles.
    pub cover: Option<CoverPaymentDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CoverPaymentDetails {
    pub ordering_customer: String,
    pub beneficiary_customer: String,
}

impl FinancialInstitutionTransferDocument {
    pub fn is_cover_payment(&self) -> bool {
        self.cover.is_some()
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationReport::new()
    }
}
