//! Binary magic database parser
//!
//! Layout:
//!
//! ```text
//! "MIME-Magic\0\n"
//! "[" priority ":" mime-type "]\n"
//! [indent] ">" start-offset "=" value-length(u16 BE) value
//!     ["&" mask] ["~" word-size] ["+" range-length] "\n"
//! ```
//!
//! Values and masks are stored big-endian and buffer words are read
//! big-endian too, so the matcher compares raw bytes on every host. The
//! word size only constrains the value length.

use crate::domain::entities::{MagicClause, MagicRule, MimeType};
use crate::error::MagicParseError;

pub const MAGIC_HEADER: &[u8; 12] = b"MIME-Magic\0\n";

const MAX_PRIORITY: u64 = 100;

/// Decodes a complete magic database into rules, in file order
pub fn parse_magic(data: &[u8]) -> Result<Vec<MagicRule>, MagicParseError> {
    if !data.starts_with(MAGIC_HEADER) {
        return Err(MagicParseError::BadHeader);
    }

    let mut cursor = Cursor {
        data,
        pos: MAGIC_HEADER.len(),
    };
    let mut rules = Vec::new();

    while !cursor.at_end() {
        cursor.expect(b'[')?;
        let mut rule = cursor.section_header()?;
        cursor.expect(b'\n')?;

        let mut previous_indent = None;
        while !cursor.at_end() && cursor.peek() != Some(b'[') {
            let start = cursor.pos;
            let (indent, clause) = cursor.clause()?;
            attach(&mut rule, indent, clause).map_err(|()| MagicParseError::IndentJump {
                indent,
                previous: previous_indent,
                offset: start,
            })?;
            previous_indent = Some(indent);
        }
        rules.push(rule);
    }

    tracing::trace!(rules = rules.len(), "parsed magic database");
    Ok(rules)
}

/// Appends `clause` as the last child `indent` levels down the rightmost path
fn attach(rule: &mut MagicRule, indent: usize, clause: MagicClause) -> Result<(), ()> {
    let roots = rule.clauses_mut();
    if indent == 0 {
        roots.push(clause);
        return Ok(());
    }

    let mut parent = roots.last_mut().ok_or(())?;
    for _ in 1..indent {
        parent = parent.last_child_mut().ok_or(())?;
    }
    parent.push_child(clause);
    Ok(())
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<(), MagicParseError> {
        let offset = self.pos;
        match self.next() {
            Some(byte) if byte == expected => Ok(()),
            found => Err(MagicParseError::Expected {
                expected: expected as char,
                found: found.map(char::from),
                offset,
            }),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], MagicParseError> {
        let data = self.data;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(MagicParseError::UnexpectedEof {
                offset: self.data.len(),
            })?;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads a run of ASCII digits; `None` when there are none
    fn number(&mut self) -> Result<Option<u64>, MagicParseError> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(byte @ b'0'..=b'9') = self.peek() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(byte - b'0')))
                .ok_or(MagicParseError::NumberOverflow { offset: start })?;
            self.pos += 1;
        }
        Ok((self.pos > start).then_some(value))
    }

    fn required_number(&mut self) -> Result<usize, MagicParseError> {
        let offset = self.pos;
        match self.number()? {
            Some(value) => {
                usize::try_from(value).map_err(|_| MagicParseError::NumberOverflow { offset })
            }
            None => Err(self.unexpected()),
        }
    }

    fn unexpected(&self) -> MagicParseError {
        match self.peek() {
            Some(byte) => MagicParseError::UnexpectedChar {
                found: byte as char,
                offset: self.pos,
            },
            None => MagicParseError::UnexpectedEof { offset: self.pos },
        }
    }

    /// Parses `priority:mime]` (the opening bracket is already consumed)
    fn section_header(&mut self) -> Result<MagicRule, MagicParseError> {
        let offset = self.pos;
        let len = self.data[self.pos..]
            .iter()
            .position(|&b| b == b']' || b == b'\n')
            .ok_or(MagicParseError::UnexpectedEof {
                offset: self.data.len(),
            })?;
        let head = self.take(len)?;
        self.expect(b']')?;

        let invalid = |reason: &str| MagicParseError::SectionHeader {
            offset,
            reason: reason.to_string(),
        };
        let head = std::str::from_utf8(head).map_err(|_| invalid("header is not UTF-8"))?;
        let (priority, mime) = head.split_once(':').ok_or_else(|| invalid("missing ':'"))?;
        if priority.is_empty() || !priority.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("priority is not a number"));
        }
        let priority: u64 = priority
            .parse()
            .map_err(|_| MagicParseError::NumberOverflow { offset })?;
        if priority > MAX_PRIORITY {
            return Err(MagicParseError::PriorityOutOfRange { priority, offset });
        }
        if mime.is_empty() {
            return Err(invalid("empty MIME type"));
        }

        // priority <= 100 fits in a u8
        Ok(MagicRule::new(priority as u8, MimeType::new(mime)))
    }

    fn clause(&mut self) -> Result<(usize, MagicClause), MagicParseError> {
        let indent = match self.number()? {
            Some(indent) => {
                usize::try_from(indent).map_err(|_| MagicParseError::NumberOverflow {
                    offset: self.pos,
                })?
            }
            None => 0,
        };
        self.expect(b'>')?;
        let offset = self.required_number()?;
        self.expect(b'=')?;

        let value_start = self.pos;
        let len_bytes = self.take(2)?;
        let len = usize::from(u16::from_be_bytes([len_bytes[0], len_bytes[1]]));
        let value = self.take(len)?.to_vec();

        let mut mask: Option<Vec<u8>> = None;
        let mut word_size = 1;
        let mut range_length = 1;
        // Suffixes must come in the order '&', '~', '+', each at most once
        let mut stage = 0;
        loop {
            let at = self.pos;
            let next_stage = match self.next() {
                Some(b'\n') => break,
                Some(b'&') => 1,
                Some(b'~') => 2,
                Some(b'+') => 3,
                Some(byte) => {
                    return Err(MagicParseError::UnexpectedChar {
                        found: byte as char,
                        offset: at,
                    });
                }
                None => return Err(MagicParseError::UnexpectedEof { offset: at }),
            };
            if next_stage <= stage {
                return Err(MagicParseError::UnexpectedChar {
                    found: self.data[at] as char,
                    offset: at,
                });
            }
            stage = next_stage;
            match stage {
                1 => mask = Some(self.take(len)?.to_vec()),
                2 => word_size = self.required_number()?,
                _ => range_length = self.required_number()?,
            }
        }

        if !matches!(word_size, 1 | 2 | 4) {
            return Err(MagicParseError::InvalidWordSize {
                word_size,
                offset: value_start,
            });
        }
        if len % word_size != 0 {
            return Err(MagicParseError::MisalignedValue {
                length: len,
                word_size,
                offset: value_start,
            });
        }
        if range_length == 0 {
            return Err(MagicParseError::EmptyRange {
                offset: value_start,
            });
        }

        let mut clause = MagicClause::new(offset, value)
            .with_word_size(word_size)
            .with_range(range_length);
        if let Some(mask) = mask {
            clause = clause.with_mask(mask);
        }
        Ok((indent, clause))
    }
}
