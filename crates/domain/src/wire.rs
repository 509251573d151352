//! DNS wire format codec.
//!
//! Decoding follows compression pointers; encoding always writes names
//! uncompressed. The OPT pseudo-record is lifted out of the additional
//! section into [`WireMessage::edns`] on decode and written back last on
//! encode. Nothing here does I/O.

mod header;
mod name;
mod rdata;
mod reader;
mod writer;

pub use header::{Flags, Opcode, ResponseCode};

use bytes::Bytes;

use crate::dns_record::{RecordClass, RecordData, RecordType, ResourceRecord};
use crate::errors::{DecodeError, EncodeError};
use rdata::{decode_rdata, encode_rdata};
use reader::WireReader;
use writer::WireWriter;

pub const HEADER_LEN: usize = 12;
/// Payload ceiling for clients that do not send EDNS0.
pub const DEFAULT_UDP_PAYLOAD: usize = 512;
/// Size advertised on queries we send upstream.
pub const ADVERTISED_UDP_PAYLOAD: u16 = 1232;

// fixed part of a record after its owner name
const RR_FIXED_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub record_type: RecordType,
    pub class: RecordClass,
}

impl Question {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
            class: RecordClass::IN,
        }
    }
}

/// EDNS0 parameters carried by the OPT pseudo-record (RFC 6891).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edns {
    pub udp_payload_size: u16,
    pub extended_rcode: u8,
    pub version: u8,
    pub flags: u16,
    /// Raw option TLVs, passed through untouched.
    pub options: Vec<u8>,
}

impl Edns {
    pub fn new(udp_payload_size: u16) -> Self {
        Self {
            udp_payload_size,
            extended_rcode: 0,
            version: 0,
            flags: 0,
            options: Vec::new(),
        }
    }

    fn wire_len(&self) -> usize {
        1 + RR_FIXED_LEN + self.options.len()
    }
}

/// A DNS message as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WireMessage {
    pub id: u16,
    pub flags: Flags,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
    pub edns: Option<Edns>,
}

impl WireMessage {
    /// A recursive query for one question, advertising EDNS0.
    pub fn query(id: u16, question: Question) -> Self {
        Self {
            id,
            flags: Flags::query(),
            questions: vec![question],
            edns: Some(Edns::new(ADVERTISED_UDP_PAYLOAD)),
            ..Self::default()
        }
    }

    /// Largest UDP response the sender of this message accepts.
    pub fn max_udp_payload(&self) -> usize {
        self.edns
            .as_ref()
            .map(|e| (e.udp_payload_size as usize).max(DEFAULT_UDP_PAYLOAD))
            .unwrap_or(DEFAULT_UDP_PAYLOAD)
    }
}

pub fn decode(bytes: &[u8]) -> Result<WireMessage, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::Truncated);
    }

    let mut r = WireReader::new(bytes);
    let id = r.read_u16()?;
    let flags = Flags::from_u16(r.read_u16()?);
    let qdcount = r.read_u16()? as usize;
    let ancount = r.read_u16()? as usize;
    let nscount = r.read_u16()? as usize;
    let arcount = r.read_u16()? as usize;

    // a question is at least 5 bytes, a record at least 11
    let mut questions = Vec::with_capacity(qdcount.min(r.remaining() / 5));
    for _ in 0..qdcount {
        let name = name::read_name(&mut r)?;
        let record_type = RecordType::from_u16(r.read_u16()?);
        let class = RecordClass::from_u16(r.read_u16()?);
        questions.push(Question {
            name,
            record_type,
            class,
        });
    }

    let answers = read_section(&mut r, ancount)?;
    let authority = read_section(&mut r, nscount)?;

    let mut additional = read_section(&mut r, arcount)?;
    let edns = additional
        .iter()
        .position(|rr| rr.record_type == RecordType::OPT)
        .map(|idx| edns_from_record(additional.remove(idx)));

    Ok(WireMessage {
        id,
        flags,
        questions,
        answers,
        authority,
        additional,
        edns,
    })
}

fn read_section(r: &mut WireReader<'_>, count: usize) -> Result<Vec<ResourceRecord>, DecodeError> {
    let mut records = Vec::with_capacity(count.min(r.remaining() / (RR_FIXED_LEN + 1)));
    for _ in 0..count {
        records.push(read_record(r)?);
    }
    Ok(records)
}

fn read_record(r: &mut WireReader<'_>) -> Result<ResourceRecord, DecodeError> {
    let name = name::read_name(r)?;
    let record_type = RecordType::from_u16(r.read_u16()?);
    let class = RecordClass::from_u16(r.read_u16()?);
    let ttl = r.read_u32()?;
    let rdlen = r.read_u16()? as usize;
    if rdlen > r.remaining() {
        return Err(DecodeError::Truncated);
    }

    let rdata_start = r.position();
    let mut rdata_reader = r.clone();
    let data = match decode_rdata(&mut rdata_reader, record_type, rdlen) {
        Ok(data) => data,
        Err(DecodeError::UnsupportedType(_)) => {
            RecordData::Opaque(r.data()[rdata_start..rdata_start + rdlen].to_vec())
        }
        Err(e) => return Err(e),
    };
    r.set_position(rdata_start + rdlen);

    Ok(ResourceRecord {
        name,
        record_type,
        class,
        ttl,
        data,
    })
}

fn edns_from_record(rr: ResourceRecord) -> Edns {
    let options = match rr.data {
        RecordData::Opaque(bytes) => bytes,
        _ => Vec::new(),
    };
    Edns {
        udp_payload_size: rr.class.to_u16(),
        extended_rcode: (rr.ttl >> 24) as u8,
        version: (rr.ttl >> 16) as u8,
        flags: rr.ttl as u16,
        options,
    }
}

/// Encodes the whole message with no size ceiling (TCP, DoH, upstream queries).
pub fn encode(msg: &WireMessage) -> Result<Bytes, EncodeError> {
    encode_with_limit(msg, usize::MAX)
}

/// Encodes at most `limit` bytes.
///
/// Answers that do not fit are dropped from the first overflowing record
/// onward and the TC flag is set. Authority and additional records that do
/// not fit are omitted without setting TC. The header, questions and OPT
/// record are always written.
pub fn encode_with_limit(msg: &WireMessage, limit: usize) -> Result<Bytes, EncodeError> {
    let mut w = WireWriter::with_capacity(limit.min(DEFAULT_UDP_PAYLOAD));
    w.put_u16(msg.id);
    w.put_u16(0);
    w.put_u16(msg.questions.len() as u16);
    w.put_u16(0);
    w.put_u16(0);
    w.put_u16(0);

    for q in &msg.questions {
        w.put_name(&q.name)?;
        w.put_u16(q.record_type.to_u16());
        w.put_u16(q.class.to_u16());
    }

    let reserve = msg.edns.as_ref().map(Edns::wire_len).unwrap_or(0);
    let budget = limit.saturating_sub(reserve);

    let (ancount, truncated) = write_section(&mut w, &msg.answers, budget)?;
    let (nscount, additional_count) = if truncated {
        (0, 0)
    } else {
        let (ns, ns_cut) = write_section(&mut w, &msg.authority, budget)?;
        let ar = if ns_cut {
            0
        } else {
            write_section(&mut w, &msg.additional, budget)?.0
        };
        (ns, ar)
    };

    let mut arcount = additional_count;
    if let Some(edns) = &msg.edns {
        write_opt(&mut w, edns);
        arcount += 1;
    }

    let flags = Flags {
        truncated: msg.flags.truncated || truncated,
        ..msg.flags
    };
    w.patch_u16(2, flags.to_u16());
    w.patch_u16(6, ancount as u16);
    w.patch_u16(8, nscount as u16);
    w.patch_u16(10, arcount as u16);

    Ok(w.freeze())
}

/// Writes records while they fit in `budget`. Returns how many were written
/// and whether the section was cut short.
fn write_section(
    w: &mut WireWriter,
    records: &[ResourceRecord],
    budget: usize,
) -> Result<(usize, bool), EncodeError> {
    for (written, rr) in records.iter().enumerate() {
        let mark = w.len();
        write_record(w, rr)?;
        if w.len() > budget {
            w.truncate(mark);
            return Ok((written, true));
        }
    }
    Ok((records.len(), false))
}

fn write_record(w: &mut WireWriter, rr: &ResourceRecord) -> Result<(), EncodeError> {
    w.put_name(&rr.name)?;
    w.put_u16(rr.record_type.to_u16());
    w.put_u16(rr.class.to_u16());
    w.put_u32(rr.ttl);
    let len_at = w.len();
    w.put_u16(0);
    encode_rdata(w, &rr.data)?;
    let rdlen = w.len() - len_at - 2;
    if rdlen > u16::MAX as usize {
        return Err(EncodeError::RdataTooLong);
    }
    w.patch_u16(len_at, rdlen as u16);
    Ok(())
}

fn write_opt(w: &mut WireWriter, edns: &Edns) {
    w.put_u8(0);
    w.put_u16(RecordType::OPT.to_u16());
    w.put_u16(edns.udp_payload_size);
    w.put_u32(
        ((edns.extended_rcode as u32) << 24) | ((edns.version as u32) << 16) | edns.flags as u32,
    );
    w.put_u16(edns.options.len() as u16);
    w.put_slice(&edns.options);
}
