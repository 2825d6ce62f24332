use serde::{Deserialize, Serialize};

use crate::codes::reason_code::ReasonCode;
use crate::error::{ParseError, ValidationReport};

/// pain.002 Customer Payment Status Report: references the original
/// message/group and carries one status record per original transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PaymentStatusReportDocument {
    pub original_message_id: String,
    pub original_message_name_id: String,
    pub group_status: Option<PaymentStatus>,
    pub transaction_statuses: Vec<TransactionStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PaymentStatus {
    Accepted,
    AcceptedSettlementCompleted,
    AcceptedTechnicalValidation,
    Pending,
    Rejected,
    PartiallyAccepted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TransactionStatus {
    pub original_end_to_end_id: String,
    pub original_instruction_id: Option<String>,
    pub status: PaymentStatus,
    pub reason: Option<ReasonCode>,
    pub additional_information: Option<String>,
}

impl PaymentStatusReportDocument {
    /// A status report is self-consistent only if a `Rejected`/`PartiallyAccepted`
    /// transaction status carries a reason explaining why.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.original_message_id.is_empty() {
            report.push(ParseError::MissingField("OrgnlMsgId".into()));
        }
        for (i, status) in self.transaction_statuses.iter().enumerate() {
            if matches!(
                status.status,
                PaymentStatus::Rejected | PaymentStatus::PartiallyAccepted
            ) && status.reason.is_none()
            {
                report.push(ParseError::Inconsistency(format!(
                    "transaction status #{i} is {:?} but carries no reason code",
                    status.status
                )));
            }
        }
        report
    }
}
