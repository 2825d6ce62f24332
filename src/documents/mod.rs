//! Document types (C3): the logical payload a [`crate::swift_message::SwiftMessage`]
//! or an ISO 20022/DATEV file carries, independent of its wire encoding.

pub mod credit_transfer;
pub mod datev;
pub mod fi_transfer;
pub mod pain001;
pub mod pain002;
pub mod statement;

pub use credit_transfer::CreditTransferDocument;
pub use datev::DatevBookingBatch;
pub use fi_transfer::FinancialInstitutionTransferDocument;
pub use pain001::PaymentInitiationDocument;
pub use pain002::PaymentStatusReportDocument;
pub use statement::StatementDocument;
