use bytes::{BufMut, BytesMut};

use super::reader::WireReader;
use crate::errors::{DecodeError, EncodeError};

const MAX_WIRE_NAME_LEN: usize = 255;
const MAX_POINTER_JUMPS: usize = 128;

/// Reads a possibly compressed name, leaving the reader after it.
///
/// Every pointer must target an offset strictly before the label run it
/// appears in. Targets therefore decrease on each jump, which rules out both
/// forward references and cycles.
pub(crate) fn read_name(reader: &mut WireReader<'_>) -> Result<String, DecodeError> {
    let data = reader.data();
    let mut pos = reader.position();
    let mut run_start = pos;
    let mut resume_at: Option<usize> = None;
    let mut jumps = 0usize;
    let mut wire_len = 1usize;
    let mut name = String::new();

    loop {
        let len = *data.get(pos).ok_or(DecodeError::Truncated)?;
        match len & 0xC0 {
            0x00 => {
                if len == 0 {
                    pos += 1;
                    break;
                }
                let start = pos + 1;
                let end = start + len as usize;
                let label = data.get(start..end).ok_or(DecodeError::Truncated)?;
                wire_len += label.len() + 1;
                if wire_len > MAX_WIRE_NAME_LEN {
                    return Err(DecodeError::InvalidLabel);
                }
                if !name.is_empty() {
                    name.push('.');
                }
                push_label(&mut name, label);
                pos = end;
            }
            0xC0 => {
                let low = *data.get(pos + 1).ok_or(DecodeError::Truncated)?;
                let target = (((len & 0x3F) as usize) << 8) | low as usize;
                if target >= run_start {
                    return Err(DecodeError::MalformedCompression);
                }
                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(DecodeError::MalformedCompression);
                }
                if resume_at.is_none() {
                    resume_at = Some(pos + 2);
                }
                pos = target;
                run_start = target;
            }
            _ => return Err(DecodeError::InvalidLabel),
        }
    }

    reader.set_position(resume_at.unwrap_or(pos));
    Ok(name)
}

/// Appends one wire label in presentation form.
///
/// Labels that are valid UTF-8 keep their characters; otherwise every byte
/// outside printable ASCII becomes `\DDD`. Control bytes are always escaped,
/// as are `.` and `\\`, so [`write_name`] restores the exact octets.
fn push_label(name: &mut String, label: &[u8]) {
    match std::str::from_utf8(label) {
        Ok(text) => {
            for c in text.chars() {
                match c {
                    '.' | '\\' => {
                        name.push('\\');
                        name.push(c);
                    }
                    c if c.is_ascii_control() => push_decimal_escape(name, c as u8),
                    c => name.push(c),
                }
            }
        }
        Err(_) => {
            for &b in label {
                match b {
                    b'.' | b'\\' => {
                        name.push('\\');
                        name.push(b as char);
                    }
                    0x20..=0x7E => name.push(b as char),
                    _ => push_decimal_escape(name, b),
                }
            }
        }
    }
}

fn push_decimal_escape(name: &mut String, b: u8) {
    name.push('\\');
    name.push_str(&format!("{:03}", b));
}

/// Splits a presentation name into raw labels, resolving `\X` and `\DDD`.
fn parse_labels(name: &str) -> Result<Vec<Vec<u8>>, EncodeError> {
    let bytes = name.as_bytes();
    let mut labels = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                if current.is_empty() {
                    return Err(EncodeError::EmptyLabel(name.to_string()));
                }
                labels.push(std::mem::take(&mut current));
                i += 1;
            }
            b'\\' => {
                let rest = &bytes[i + 1..];
                match rest {
                    [d0, d1, d2, ..] if [d0, d1, d2].iter().all(|d| d.is_ascii_digit()) => {
                        let value = [d0, d1, d2]
                            .iter()
                            .fold(0u16, |acc, &&d| acc * 10 + u16::from(d - b'0'));
                        let byte = u8::try_from(value)
                            .map_err(|_| EncodeError::InvalidEscape(name.to_string()))?;
                        current.push(byte);
                        i += 4;
                    }
                    [c, ..] if !c.is_ascii_digit() => {
                        current.push(*c);
                        i += 2;
                    }
                    _ => return Err(EncodeError::InvalidEscape(name.to_string())),
                }
            }
            b => {
                current.push(b);
                i += 1;
            }
        }
    }

    if !current.is_empty() {
        labels.push(current);
    }
    Ok(labels)
}

/// Writes `name` uncompressed. The root is `""` or `"."`.
pub(crate) fn write_name(buf: &mut BytesMut, name: &str) -> Result<(), EncodeError> {
    if name.is_empty() || name == "." {
        buf.put_u8(0);
        return Ok(());
    }

    // A trailing unescaped dot only marks the root.
    let trimmed = match name.strip_suffix('.') {
        Some(rest) if !ends_with_escape(rest) => rest,
        _ => name,
    };

    let labels = parse_labels(trimmed)?;
    let wire_len: usize = labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1;
    if wire_len > MAX_WIRE_NAME_LEN {
        return Err(EncodeError::NameTooLong(name.to_string()));
    }

    for label in &labels {
        if label.len() > 63 {
            return Err(EncodeError::LabelTooLong(
                String::from_utf8_lossy(label).into_owned(),
            ));
        }
        buf.put_u8(label.len() as u8);
        buf.put_slice(label);
    }
    buf.put_u8(0);
    Ok(())
}

/// True when `s` ends in an odd run of backslashes, i.e. the next character
/// would be escaped.
fn ends_with_escape(s: &str) -> bool {
    s.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}
