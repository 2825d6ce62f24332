//! Generators (C5): turn [`crate::documents`] values back into wire format.
//!
//! `mt_writer` holds the helpers shared by every MT generator;
//! `statement_gen`/`credit_transfer_gen`/`fi_transfer_gen` cover the MT
//! families. `xml_builder` is the shared streaming element-builder behind
//! the `camt053_writer`/`pain001_writer`/`pain002_writer` ISO 20022
//! generators. `datev_writer` covers DATEV V700 CSV output.

pub mod camt053_writer;
pub mod credit_transfer_gen;
pub mod datev_writer;
pub mod fi_transfer_gen;
pub mod mt_writer;
pub mod pain001_writer;
pub mod pain002_writer;
pub mod statement_gen;
pub mod xml_builder;
