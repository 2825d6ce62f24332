//! Builders (C6): fluent, validating construction surfaces for documents
//! that would otherwise require hand-assembling nested entity structs.
//!
//! Every builder here follows the same *persistent accumulator* discipline
//! (§4.6): mutators consume `self` and return a new builder value sharing
//! unchanged fields with the one before it, so two builds can branch off a
//! shared prefix safely. `build()` runs the target document's own
//! `validate()` once and surfaces the first violation, plus an optional
//! [`crate::error::DiagnosticSink`] callback for the one non-fatal
//! "empty document" observation builders make.

pub mod camt053_builder;
pub mod credit_transfer_builder;
pub mod datev_builder;
pub mod pain001_builder;
pub mod statement_builder;
