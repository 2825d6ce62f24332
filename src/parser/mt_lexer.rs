//! Splits a raw SWIFT FIN message into its five braced blocks. This is the
//! lexer stage: it never interprets block contents, only finds their
//! boundaries, so the only error this stage can raise is [`ParseError::Lex`].

use crate::error::{ParseError, Result};

/// The five blocks of a SWIFT FIN message, as raw (un-parsed) block bodies.
/// Blocks 3 and 5 are optional; block 4 is mandatory and always present in
/// a syntactically valid message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBlocks {
    pub block1: String,
    pub block2: String,
    pub block3: Option<String>,
    pub block4: String,
    pub block5: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    ExpectBraceOpen,
    ExpectBlockNumber,
    InBlockBody { block: u8, depth: u32 },
}

/// Lexes `{1:...}{2:...}{3:...}{4:...-}{5:...}` into its constituent blocks.
/// Block 4 is terminated by the literal sequence `-}` (a hyphen immediately
/// followed by the closing brace), since its body is free text that may
/// itself contain unbalanced braces.
pub fn lex(message: &str) -> Result<RawBlocks> {
    let message = message.trim();
    let mut blocks = RawBlocks::default();
    let mut state = LexState::ExpectBraceOpen;
    let mut current = String::new();
    let mut chars = message.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match state {
            LexState::ExpectBraceOpen => {
                if ch != '{' {
                    if ch.is_whitespace() {
                        continue;
                    }
                    return Err(ParseError::Lex(format!(
                        "expected '{{' at byte offset {idx}, found '{ch}'"
                    )));
                }
                state = LexState::ExpectBlockNumber;
            }
            LexState::ExpectBlockNumber => {
                let mut digits = String::new();
                digits.push(ch);
                while let Some((_, next)) = chars.peek() {
                    if next.is_ascii_digit() {
                        digits.push(*next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek().map(|(_, c)| *c) != Some(':') {
                    return Err(ParseError::Lex(format!(
                        "expected ':' after block number at offset {idx}"
                    )));
                }
                chars.next();
                let block: u8 = digits
                    .parse()
                    .map_err(|_| ParseError::Lex(format!("invalid block number '{digits}'")))?;
                current.clear();
                state = LexState::InBlockBody { block, depth: 0 };
            }
            LexState::InBlockBody { block, depth } => {
                if block == 4 {
                    if ch == '-' && chars.peek().map(|(_, c)| *c) == Some('}') {
                        chars.next();
                        blocks.block4 = current.clone();
                        current.clear();
                        state = LexState::ExpectBraceOpen;
                        continue;
                    }
                    current.push(ch);
                    continue;
                }
                match ch {
                    '{' => {
                        current.push(ch);
                        state = LexState::InBlockBody {
                            block,
                            depth: depth + 1,
                        };
                    }
                    '}' if depth == 0 => {
                        assign_block(&mut blocks, block, current.clone())?;
                        current.clear();
                        state = LexState::ExpectBraceOpen;
                    }
                    '}' => {
                        current.push(ch);
                        state = LexState::InBlockBody {
                            block,
                            depth: depth - 1,
                        };
                    }
                    other => current.push(other),
                }
            }
        }
    }

    if blocks.block1.is_empty() {
        return Err(ParseError::Lex("missing block 1 (basic header)".into()));
    }
    if blocks.block2.is_empty() {
        return Err(ParseError::Lex(
            "missing block 2 (application header)".into(),
        ));
    }
    Ok(blocks)
}

fn assign_block(blocks: &mut RawBlocks, block: u8, body: String) -> Result<()> {
    match block {
        1 => blocks.block1 = body,
        2 => blocks.block2 = body,
        3 => blocks.block3 = Some(body),
        5 => blocks.block5 = Some(body),
        other => {
            return Err(ParseError::Lex(format!(
                "unexpected block number {other}"
            )))
        }
    }
    Ok(())
}
