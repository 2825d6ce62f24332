//! Domain entities shared by every document type: money amounts, parties,
//! accounts, institutions, balances, transactions/entries, remittance
//! information, payment identification, mandates, and group headers.

pub mod account;
pub mod address;
pub mod balance;
pub mod entry;
pub mod group_header;
pub mod institution;
pub mod mandate;
pub mod money;
pub mod party;
pub mod payment_id;
pub mod remittance;
pub mod transaction;

pub use account::AccountIdentification;
pub use address::PostalAddress;
pub use balance::Balance;
pub use entry::Entry;
pub use group_header::GroupHeader;
pub use institution::FinancialInstitutionIdentification;
pub use mandate::Mandate;
pub use money::Money;
pub use party::Party;
pub use payment_id::PaymentIdentification;
pub use remittance::RemittanceInformation;
pub use transaction::Transaction;
