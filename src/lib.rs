//! # fin-interchange
//!
//! A format engine for SWIFT FIN MT messages (MT101/103/104/200/202(+COV)/
//! 900/910/920/940/941/942/950), the ISO 20022 `pain.*`/`camt.*` families,
//! and DATEV V700 CSV exports.
//!
//! The crate is organised leaf-first:
//! - [`codes`] — closed code tables (currencies, countries, message types, …)
//! - [`entities`] — domain value types shared across document kinds
//! - [`headers`] / [`swift_message`] — the SWIFT FIN five-block envelope
//! - [`documents`] — the logical payload a message or file carries
//! - [`parser`] — wire format → document
//! - [`generator`] — document → wire format
//! - [`builder`] — ergonomic, validating document construction
//! - [`schema`] — ISO 20022 namespace/version resolution
//!
//! Every document and entity value is immutable after construction, so
//! parsed or built values may be shared freely across threads; builders are
//! `!Sync` by convention (confined to one thread at a time) even though
//! nothing here spawns one. The engine performs no I/O, logging, or
//! validation against XSD schemas directly — callers that need schema
//! validation resolve the namespace via [`schema::version_resolver`] and
//! hand the generated document to their own validator.
//!
//! ## Quick Start
//! ```rust
//! use fin_interchange::swift_message::SwiftMessage;
//!
//! # fn main() -> fin_interchange::error::Result<()> {
//! let raw = "{1:F01BANKDEFFAXXX0000000000}{2:I103BANKUS33XXXXN}{4:\r\n:20:REF123\r\n:23B:CRED\r\n-}";
//! let message = SwiftMessage::parse(raw)?;
//! let _ = message.message_type()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod codes;
pub mod documents;
pub mod entities;
pub mod error;
pub mod generator;
pub mod headers;
pub mod parser;
pub mod schema;
pub mod swift_message;

pub use error::{ParseError, Result};
pub use headers::{ApplicationHeader, BasicHeader, Trailer, UserHeader};
pub use swift_message::SwiftMessage;
