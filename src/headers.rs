//! SWIFT FIN envelope blocks: Basic Header (1), Application Header (2),
//! User Header (3), and Trailer (5). Block 4 (text) is handled by
//! `parser::mt_body` since its grammar is message-type independent but its
//! contents are not.

use crate::error::{ParseError, Result};

/// Block 1: sender identification and routing.
///
/// Format: `F01SSSSSSSSSCCC0000NNNNNN` (25 chars) — app id (1) + service id
/// (2) + logical terminal (12, an 8-char BIC plus a 4-char terminal/branch
/// suffix) + session number (4) + sequence number (6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicHeader {
    pub application_id: String,
    pub service_id: String,
    pub logical_terminal: String,
    pub session_number: String,
    pub sequence_number: String,
}

impl BasicHeader {
    pub fn sender_bic(&self) -> &str {
        &self.logical_terminal[..8.min(self.logical_terminal.len())]
    }

    pub fn parse(block1: &str) -> Result<Self> {
        if block1.len() != 25 {
            return Err(ParseError::Lex(format!(
                "block 1 must be exactly 25 characters, got {}",
                block1.len()
            )));
        }
        Ok(BasicHeader {
            application_id: block1[0..1].to_string(),
            service_id: block1[1..3].to_string(),
            logical_terminal: block1[3..15].to_string(),
            session_number: block1[15..19].to_string(),
            sequence_number: block1[19..25].to_string(),
        })
    }

    pub fn to_block_string(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.application_id,
            self.service_id,
            self.logical_terminal,
            self.session_number,
            self.sequence_number
        )
    }
}

/// Block 2, input direction: message being submitted to the network.
///
/// Format: `I<mt>DDDDDDDDDDDD<priority>[<delivery_monitoring>][<obsolescence_period>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputApplicationHeader {
    pub message_type: String,
    pub destination_address: String,
    pub priority: char,
    pub delivery_monitoring: Option<char>,
    pub obsolescence_period: Option<String>,
}

/// Block 2, output direction: message delivered from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputApplicationHeader {
    pub message_type: String,
    pub input_time: String,
    pub mir: String,
    pub output_date: String,
    pub output_time: String,
    pub priority: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationHeader {
    Input(InputApplicationHeader),
    Output(OutputApplicationHeader),
}

impl ApplicationHeader {
    pub fn parse(block2: &str) -> Result<Self> {
        let mut chars = block2.chars();
        let direction = chars
            .next()
            .ok_or_else(|| ParseError::Lex("block 2 is empty".into()))?;
        match direction {
            'I' => {
                if block2.len() < 17 {
                    return Err(ParseError::Lex(format!(
                        "input application header too short: {block2}"
                    )));
                }
                let message_type = block2[1..4].to_string();
                let destination_address = block2[4..16].to_string();
                let priority = block2.as_bytes()[16] as char;
                let rest = &block2[17..];
                let delivery_monitoring = rest.chars().next();
                let obsolescence_period = if rest.len() > 1 {
                    Some(rest[1..].to_string())
                } else {
                    None
                };
                Ok(ApplicationHeader::Input(InputApplicationHeader {
                    message_type,
                    destination_address,
                    priority,
                    delivery_monitoring,
                    obsolescence_period,
                }))
            }
            'O' => {
                if block2.len() < 16 {
                    return Err(ParseError::Lex(format!(
                        "output application header too short: {block2}"
                    )));
                }
                let message_type = block2[1..4].to_string();
                let input_time = block2[4..8].to_string();
                let mir = block2[8..36.min(block2.len())].to_string();
                let tail = &block2[mir.len() + 8..];
                let output_date = tail.get(0..6).unwrap_or_default().to_string();
                let output_time = tail.get(6..10).unwrap_or_default().to_string();
                let priority = tail.chars().nth(10).unwrap_or('N');
                Ok(ApplicationHeader::Output(OutputApplicationHeader {
                    message_type,
                    input_time,
                    mir,
                    output_date,
                    output_time,
                    priority,
                }))
            }
            other => Err(ParseError::invalid_value(
                "block2.direction",
                format!("unknown direction marker '{other}'"),
            )),
        }
    }

    pub fn message_type(&self) -> &str {
        match self {
            ApplicationHeader::Input(h) => &h.message_type,
            ApplicationHeader::Output(h) => &h.message_type,
        }
    }

    pub fn to_block_string(&self) -> String {
        match self {
            ApplicationHeader::Input(h) => {
                let mut s = format!(
                    "I{}{}{}",
                    h.message_type, h.destination_address, h.priority
                );
                if let Some(dm) = h.delivery_monitoring {
                    s.push(dm);
                }
                if let Some(op) = &h.obsolescence_period {
                    s.push_str(op);
                }
                s
            }
            ApplicationHeader::Output(h) => format!(
                "O{}{}{}{}{}{}",
                h.message_type, h.input_time, h.mir, h.output_date, h.output_time, h.priority
            ),
        }
    }
}

/// Block 3: optional service tags. We keep only the tags named in the
/// specification (`103`, `108`, `111`, `113`, `115`, `119`, `121`, `165`),
/// surfacing everything else through `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserHeader {
    /// Tag 103: service identifier.
    pub service_id: Option<String>,
    /// Tag 108: message user reference.
    pub mur: Option<String>,
    /// Tag 111: service type identifier.
    pub service_type_id: Option<String>,
    /// Tag 113: banking priority.
    pub banking_priority: Option<String>,
    /// Tag 115: addressee information.
    pub addressee_information: Option<String>,
    /// Tag 119: validation flag (e.g. "STP", "REMIT", "COV").
    pub validation_flag: Option<String>,
    /// Tag 121: UETR (RFC 4122 UUID v4).
    pub uetr: Option<String>,
    /// Tag 165: payment release information.
    pub payment_release_information: Option<String>,
    /// Any tag not named above, preserved verbatim.
    pub other: Vec<(String, String)>,
}

impl UserHeader {
    pub fn parse(block3: &str) -> Result<Self> {
        let mut header = UserHeader::default();
        let mut rest = block3.trim_start_matches('{');
        while let Some(colon) = rest.find(':') {
            let after = &rest[colon + 1..];
            let Some(end) = after.find('}') else {
                break;
            };
            let body = &after[..end];
            let Some(sep) = body.find(':') else {
                rest = &after[end + 1..];
                continue;
            };
            let tag = &body[..sep];
            let value = &body[sep + 1..];
            match tag {
                "103" => header.service_id = Some(value.to_string()),
                "108" => header.mur = Some(value.to_string()),
                "111" => header.service_type_id = Some(value.to_string()),
                "113" => header.banking_priority = Some(value.to_string()),
                "115" => header.addressee_information = Some(value.to_string()),
                "119" => header.validation_flag = Some(value.to_string()),
                "121" => header.uetr = Some(value.to_string()),
                "165" => header.payment_release_information = Some(value.to_string()),
                other => header.other.push((other.to_string(), value.to_string())),
            }
            rest = &after[end + 1..];
            if !rest.starts_with('{') {
                break;
            }
            rest = &rest[1..];
        }
        Ok(header)
    }

    pub fn is_empty(&self) -> bool {
        self.service_id.is_none()
            && self.mur.is_none()
            && self.service_type_id.is_none()
            && self.banking_priority.is_none()
            && self.addressee_information.is_none()
            && self.validation_flag.is_none()
            && self.uetr.is_none()
            && self.payment_release_information.is_none()
            && self.other.is_empty()
    }

    pub fn to_block_string(&self) -> String {
        let mut out = String::new();
        let mut push = |tag: &str, value: &Option<String>| {
            if let Some(v) = value {
                out.push_str(&format!("{{{tag}:{v}}}"));
            }
        };
        push("103", &self.service_id);
        push("108", &self.mur);
        push("111", &self.service_type_id);
        push("113", &self.banking_priority);
        push("115", &self.addressee_information);
        push("119", &self.validation_flag);
        push("121", &self.uetr);
        push("165", &self.payment_release_information);
        for (tag, value) in &self.other {
            out.push_str(&format!("{{{tag}:{value}}}"));
        }
        out
    }
}

/// Block 5: trailer with checksum/security tags (`CHK`, `TNG`, `PDE`, `PDM`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trailer {
    pub checksum: Option<String>,
    pub test_and_training: bool,
    pub possible_duplicate_emission: bool,
    pub possible_duplicate_message: Option<String>,
    pub other: Vec<(String, String)>,
}

impl Trailer {
    pub fn parse(block5: &str) -> Result<Self> {
        let mut trailer = Trailer::default();
        let mut rest = block5.trim_start_matches('{');
        while let Some(colon) = rest.find(':') {
            let after = &rest[colon + 1..];
            let Some(end) = after.find('}') else {
                break;
            };
            let body = &after[..end];
            let sep = body.find(':').unwrap_or(body.len());
            let tag = &body[..sep];
            let value = if sep < body.len() {
                &body[sep + 1..]
            } else {
                ""
            };
            match tag {
                "CHK" => trailer.checksum = Some(value.to_string()),
                "TNG" => trailer.test_and_training = true,
                "PDE" => trailer.possible_duplicate_emission = true,
                "PDM" => trailer.possible_duplicate_message = Some(value.to_string()),
                other => trailer.other.push((other.to_string(), value.to_string())),
            }
            rest = &after[end + 1..];
            if !rest.starts_with('{') {
                break;
            }
            rest = &rest[1..];
        }
        Ok(trailer)
    }

    pub fn to_block_string(&self) -> String {
        let mut out = String::new();
        if let Some(chk) = &self.checksum {
            out.push_str(&format!("{{CHK:{chk}}}"));
        }
        if self.test_and_training {
            out.push_str("{TNG:}");
        }
        if self.possible_duplicate_emission {
            out.push_str("{PDE:}");
        }
        if let Some(pdm) = &self.possible_duplicate_message {
            out.push_str(&format!("{{PDM:{pdm}}}"));
        }
        for (tag, value) in &self.other {
            out.push_str(&format!("{{{tag}:{value}}}"));
        }
        out
    }
}
