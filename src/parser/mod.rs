//! Parsers (C4): turns raw byte streams into [`crate::documents`] values.
//!
//! `mt_lexer`/`mt_body` handle the SWIFT FIN envelope and tag-line grammar
//! shared by every MT type; `xml_reader` and the `camt053_reader`/
//! `pain001_reader`/`pain002_reader` modules handle the ISO 20022 family;
//! `datev_reader` handles DATEV V700 CSV.

pub mod camt053_reader;
pub mod datev_reader;
pub mod mt_body;
pub mod mt_lexer;
pub mod mt_payment_reader;
pub mod mt_statement_reader;
pub mod pain001_reader;
pub mod pain002_reader;
pub mod xml_reader;
