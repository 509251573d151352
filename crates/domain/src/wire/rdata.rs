use std::net::{Ipv4Addr, Ipv6Addr};

use super::name::read_name;
use super::reader::WireReader;
use super::writer::WireWriter;
use crate::dns_record::{RecordData, RecordType};
use crate::errors::{DecodeError, EncodeError};

/// Decodes `rdlen` bytes of RDATA at the reader's position.
///
/// Returns `UnsupportedType` for types without a structured variant; the
/// message decoder downgrades those to [`RecordData::Opaque`].
pub(crate) fn decode_rdata(
    reader: &mut WireReader<'_>,
    record_type: RecordType,
    rdlen: usize,
) -> Result<RecordData, DecodeError> {
    let start = reader.position();
    let code = record_type.to_u16();

    let data = match record_type {
        RecordType::A => {
            if rdlen != 4 {
                return Err(DecodeError::BadRdataLength(code));
            }
            let b = reader.read_bytes(4)?;
            RecordData::A(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
        }
        RecordType::AAAA => {
            if rdlen != 16 {
                return Err(DecodeError::BadRdataLength(code));
            }
            let mut octets = [0u8; 16];
            octets.copy_from_slice(reader.read_bytes(16)?);
            RecordData::AAAA(Ipv6Addr::from(octets))
        }
        RecordType::CNAME => RecordData::CNAME(read_name(reader)?),
        RecordType::NS => RecordData::NS(read_name(reader)?),
        RecordType::PTR => RecordData::PTR(read_name(reader)?),
        RecordType::MX => {
            let preference = reader.read_u16()?;
            let exchange = read_name(reader)?;
            RecordData::MX {
                preference,
                exchange,
            }
        }
        RecordType::TXT => {
            let raw = reader.read_bytes(rdlen)?;
            return Ok(decode_txt(raw).unwrap_or_else(|| RecordData::Opaque(raw.to_vec())));
        }
        RecordType::SOA => RecordData::SOA {
            mname: read_name(reader)?,
            rname: read_name(reader)?,
            serial: reader.read_u32()?,
            refresh: reader.read_u32()?,
            retry: reader.read_u32()?,
            expire: reader.read_u32()?,
            minimum: reader.read_u32()?,
        },
        RecordType::SRV => RecordData::SRV {
            priority: reader.read_u16()?,
            weight: reader.read_u16()?,
            port: reader.read_u16()?,
            target: read_name(reader)?,
        },
        _ => return Err(DecodeError::UnsupportedType(code)),
    };

    if reader.position() != start + rdlen {
        return Err(DecodeError::BadRdataLength(code));
    }
    Ok(data)
}

/// Splits TXT RDATA into its character strings, `None` if any is not UTF-8
/// or the length prefixes do not tile the buffer exactly.
fn decode_txt(raw: &[u8]) -> Option<RecordData> {
    let mut parts = Vec::new();
    let mut rest = raw;
    while let Some((&len, tail)) = rest.split_first() {
        let len = len as usize;
        if tail.len() < len {
            return None;
        }
        let (chunk, next) = tail.split_at(len);
        parts.push(String::from_utf8(chunk.to_vec()).ok()?);
        rest = next;
    }
    Some(RecordData::TXT(parts))
}

/// Appends RDATA for `data`, without the length prefix.
pub(crate) fn encode_rdata(w: &mut WireWriter, data: &RecordData) -> Result<(), EncodeError> {
    match data {
        RecordData::A(addr) => w.put_slice(&addr.octets()),
        RecordData::AAAA(addr) => w.put_slice(&addr.octets()),
        RecordData::CNAME(name) | RecordData::NS(name) | RecordData::PTR(name) => {
            w.put_name(name)?
        }
        RecordData::MX {
            preference,
            exchange,
        } => {
            w.put_u16(*preference);
            w.put_name(exchange)?;
        }
        RecordData::TXT(parts) => {
            for part in parts {
                let bytes = part.as_bytes();
                if bytes.len() > 255 {
                    return Err(EncodeError::StringTooLong);
                }
                w.put_u8(bytes.len() as u8);
                w.put_slice(bytes);
            }
        }
        RecordData::SOA {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        } => {
            w.put_name(mname)?;
            w.put_name(rname)?;
            for value in [serial, refresh, retry, expire, minimum] {
                w.put_u32(*value);
            }
        }
        RecordData::SRV {
            priority,
            weight,
            port,
            target,
        } => {
            w.put_u16(*priority);
            w.put_u16(*weight);
            w.put_u16(*port);
            w.put_name(target)?;
        }
        RecordData::Opaque(bytes) => w.put_slice(bytes),
    }
    Ok(())
}
