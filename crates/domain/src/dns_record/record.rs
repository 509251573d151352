use super::{RecordClass, RecordType};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Type-specific RDATA payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(String),
    NS(String),
    PTR(String),
    MX {
        preference: u16,
        exchange: String,
    },
    TXT(Vec<String>),
    SOA {
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    /// RDATA of a type the codec does not interpret, kept byte for byte.
    Opaque(Vec<u8>),
}

impl fmt::Display for RecordData {
    /// Presentation form used by the JSON lookup surface.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::A(addr) => write!(f, "{}", addr),
            RecordData::AAAA(addr) => write!(f, "{}", addr),
            RecordData::CNAME(name) | RecordData::NS(name) | RecordData::PTR(name) => {
                f.write_str(name)
            }
            RecordData::MX {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RecordData::TXT(parts) => f.write_str(&parts.concat()),
            RecordData::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{} {} {} {} {} {} {}",
                mname, rname, serial, refresh, retry, expire, minimum
            ),
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{} {} {} {}", priority, weight, port, target),
            RecordData::Opaque(bytes) => {
                write!(f, "\\# {}", bytes.len())?;
                if !bytes.is_empty() {
                    f.write_str(" ")?;
                    for b in bytes {
                        write!(f, "{:02x}", b)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub record_type: RecordType,
    pub class: RecordClass,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, record_type: RecordType, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            record_type,
            class: RecordClass::IN,
            ttl,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_forms() {
        let mx = RecordData::MX {
            preference: 10,
            exchange: "mail.example.test".into(),
        };
        assert_eq!(mx.to_string(), "10 mail.example.test");

        let txt = RecordData::TXT(vec!["v=spf1 ".into(), "-all".into()]);
        assert_eq!(txt.to_string(), "v=spf1 -all");

        assert_eq!(RecordData::Opaque(vec![0xde, 0xad]).to_string(), "\\# 2 dead");
        assert_eq!(RecordData::Opaque(vec![]).to_string(), "\\# 0");
    }
}
