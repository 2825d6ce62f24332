//! The SWIFT FIN envelope: basic/application/user headers, the raw block 4
//! text, and the trailer, plus on-demand resolution of the message type a
//! given envelope's block 4 carries.

use crate::codes::MtType;
use crate::error::Result;
use crate::headers::{ApplicationHeader, BasicHeader, Trailer, UserHeader};
use crate::parser::mt_lexer::{self, RawBlocks};

/// A fully lexed and header-parsed SWIFT FIN message. Block 4 is kept as raw
/// text: turning it into a typed [`crate::documents`] value is a separate,
/// message-type-dispatched step performed by the `parser` readers, since the
/// same envelope shape carries a dozen unrelated bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct SwiftMessage {
    pub basic_header: BasicHeader,
    pub application_header: ApplicationHeader,
    pub user_header: Option<UserHeader>,
    pub text_block: String,
    pub trailer: Option<Trailer>,
}

impl SwiftMessage {
    /// Lexes the five blocks and parses blocks 1/2/3/5; block 4 is kept
    /// verbatim for the message-type-specific body parser.
    pub fn parse(message: &str) -> Result<Self> {
        let RawBlocks {
            block1,
            block2,
            block3,
            block4,
            block5,
        } = mt_lexer::lex(message)?;

        let basic_header = BasicHeader::parse(&block1)?;
        let application_header = ApplicationHeader::parse(&block2)?;
        let user_header = block3.as_deref().map(UserHeader::parse).transpose()?;
        let trailer = block5.as_deref().map(Trailer::parse).transpose()?;

        Ok(SwiftMessage {
            basic_header,
            application_header,
            user_header,
            text_block: block4,
            trailer,
        })
    }

    /// The message type, resolving MT202 vs MT202COV from the block 3
    /// validation flag (tag 119) when a user header is present. Delegates to
    /// [`MtType::from_swift_message`]'s application-header scan over the
    /// re-serialized envelope, so a single detector covers both a fully
    /// lexed message and naked block-4 content handed to it directly.
    pub fn message_type(&self) -> Result<MtType> {
        MtType::from_swift_message(&self.to_fin_string())
    }

    pub fn uetr(&self) -> Option<&str> {
        self.user_header.as_ref().and_then(|h| h.uetr.as_deref())
    }

    /// Re-serializes the envelope, appending a literal `-` terminator to
    /// block 4, as every MT generator in this crate does.
    pub fn to_fin_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{{1:{}}}", self.basic_header.to_block_string()));
        out.push_str(&format!("{{2:{}}}", self.application_header.to_block_string()));
        if let Some(uh) = &self.user_header {
            if !uh.is_empty() {
                out.push_str(&format!("{{3:{}}}", uh.to_block_string()));
            }
        }
        out.push_str(&format!("{{4:\n{}\n-}}", self.text_block));
        if let Some(trailer) = &self.trailer {
            out.push_str(&format!("{{5:{}}}", trailer.to_block_string()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(mtype: &str, validation_flag: Option<&str>) -> String {
        let block3 = match validation_flag {
            Some(flag) => format!("{{3:{{119:{flag}}}}}"),
            None => String::new(),
        };
        format!(
            "{{1:F01DEUTDEFFAXXX0000123456}}{{2:I{mtype}CHASUS33AXXXN}}{block3}{{4:\n:20:REF1\n:32A:231225EUR1234,56\n-}}{{5:{{CHK:123456789ABC}}}}"
        )
    }

    #[test]
    fn parses_full_envelope_and_resolves_type() {
        let msg = SwiftMessage::parse(&sample("103", None)).unwrap();
        assert_eq!(msg.message_type().unwrap(), MtType::Mt103);
        assert_eq!(msg.basic_header.sender_bic(), "DEUTDEFF");
        assert!(msg.trailer.is_some());
    }

    #[test]
    fn resolves_mt202cov_from_block3_validation_flag() {
        let msg = SwiftMessage::parse(&sample("202", Some("COV"))).unwrap();
        assert_eq!(msg.message_type().unwrap(), MtType::Mt202Cov);
    }

    #[test]
    fn round_trips_to_fin_string_preserving_text_block() {
        let msg = SwiftMessage::parse(&sample("103", None)).unwrap();
        let rendered = msg.to_fin_string();
        assert!(rendered.contains(":20:REF1"));
        assert!(rendered.starts_with("{1:F01DEUTDEFFAXXX0000123456}"));
    }
}
