//! camt.053 builder (§4.6, C6): thin wrapper over [`StatementBuilder`] that
//! exposes the ISO 20022 terminology (`account_identifier` rather than the
//! MT-flavoured `account_identification`) callers reach for when targeting
//! camt.053 output specifically, since the logical document shape is the
//! one shared [`StatementDocument`] the MT statement family also uses.

use crate::builder::statement_builder::StatementBuilder;
use crate::documents::statement::StatementDocument;
use crate::entities::balance::Balance;
use crate::entities::entry::Entry;
use crate::error::{DiagnosticSink, Result};

#[derive(Debug, Clone, Default)]
pub struct Camt053Builder {
    inner: StatementBuilder,
}

impl Camt053Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statement_id(mut self, value: impl Into<String>) -> Self {
        self.inner = self.inner.reference(value);
        self
    }

    pub fn account_identifier(mut self, value: impl Into<String>) -> Self {
        self.inner = self.inner.account_identification(value);
        self
    }

    pub fn opening_balance(mut self, value: Balance) -> Self {
        self.inner = self.inner.opening_balance(value);
        self
    }

    pub fn closing_balance(mut self, value: Balance) -> Self {
        self.inner = self.inner.closing_balance(value);
        self
    }

    pub fn add_entry(mut self, entry: Entry) -> Self {
        self.inner = self.inner.add_entry(entry);
        self
    }

    pub fn build(self, diagnostics: DiagnosticSink<'_>) -> Result<StatementDocument> {
        self.inner.build(diagnostics)
    }

    /// Builds and renders directly to camt.053 XML in one call, resolving
    /// `version` through [`crate::schema::version_resolver`].
    pub fn build_xml(self, version: Option<&str>, diagnostics: DiagnosticSink<'_>) -> Result<String> {
        let document = self.build(diagnostics)?;
        crate::generator::camt053_writer::generate(&document, version)
    }
}
