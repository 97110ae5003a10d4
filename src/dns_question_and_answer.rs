use std::fmt;
use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::CodecError;
use crate::wire::build_exact;

/// Longest label allowed by RFC 1035.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest encoded name (length bytes and terminator included).
pub const MAX_NAME_LEN: usize = 255;

/// A validated domain name such as "codecrafters.io".
///
/// Validation happens once in [`DomainName::new`]; encoding afterwards
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainName {
    name: String,
    encoded_len: usize,
}

impl DomainName {
    pub fn new(name: &str) -> Result<Self, CodecError> {
        let encoded_len = validate_domain_name(name)?;
        Ok(DomainName {
            name: name.to_string(),
            encoded_len,
        })
    }

    pub fn root() -> Self {
        DomainName {
            name: ".".to_string(),
            encoded_len: 1,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }

    /// Append the length-prefixed labels and the zero terminator.
    pub fn write_to(&self, buf: &mut impl BufMut) {
        for label in self.labels() {
            buf.put_u8(label.len() as u8);
            buf.put_slice(label.as_bytes());
        }
        buf.put_u8(0);
    }

    pub fn to_bytes(&self) -> Bytes {
        build_exact(self.encoded_len, |buf| self.write_to(buf))
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        let labels = if self.name == "." { "" } else { self.name.as_str() };
        labels.split('.').filter(|label| !label.is_empty())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Check every label and return the encoded length of the name.
fn validate_domain_name(name: &str) -> Result<usize, CodecError> {
    let invalid = |reason| CodecError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name == "." {
        return Ok(1);
    }
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }

    let mut encoded_len = 1; // zero terminator
    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid("empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid("label longer than 63 bytes"));
        }
        encoded_len += 1 + label.len();
    }

    if encoded_len > MAX_NAME_LEN {
        return Err(invalid("encoded name longer than 255 bytes"));
    }

    Ok(encoded_len)
}

/// Encode a domain name to DNS message format
/// Format: length-prefixed labels terminated with a null byte
/// Example: "example.com" -> [7]example[3]com[0]
pub fn encode_domain_name(name: &str) -> Result<Bytes, CodecError> {
    Ok(DomainName::new(name)?.to_bytes())
}

/// Common DNS record types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A = 1,     // IPv4 address
    NS = 2,    // Name server
    AAAA = 28, // IPv6 address
}

impl RecordType {
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Common DNS classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    IN = 1, // Internet
    CH = 3, // CHAOS
}

impl RecordClass {
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Width of the TTL field in a resource record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TtlWidth {
    /// 32-bit TTL as RFC 1035 section 4.1.3 requires.
    #[default]
    Rfc1035,
    /// 16-bit TTL for peers that expect the short form.
    Legacy16,
}

impl TtlWidth {
    pub fn field_len(self) -> usize {
        match self {
            TtlWidth::Rfc1035 => 4,
            TtlWidth::Legacy16 => 2,
        }
    }
}

/// DNS Question Section
/// Format: QNAME + QTYPE (2 bytes) + QCLASS (2 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: DomainName, // Domain name (e.g., "example.com")
    pub qtype: u16,       // Query type (A, AAAA, CNAME, etc.)
    pub qclass: u16,      // Query class (usually IN for Internet)
}

impl DnsQuestion {
    pub fn new(name: DomainName, qtype: RecordType, qclass: RecordClass) -> Self {
        DnsQuestion {
            name,
            qtype: qtype.to_u16(),
            qclass: qclass.to_u16(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.name.encoded_len() + 4
    }

    /// Convert the question to bytes
    pub fn to_bytes(&self) -> Bytes {
        build_exact(self.encoded_len(), |buf| {
            self.name.write_to(buf);
            buf.put_u16(self.qtype);
            buf.put_u16(self.qclass);
        })
    }
}

/// DNS Answer/Resource Record Section
/// Format: NAME + TYPE (2 bytes) + CLASS (2 bytes) + TTL (4 bytes) + RDLENGTH (2 bytes) + RDATA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub name: DomainName, // Domain name
    pub rtype: u16,       // Record type (A, AAAA, CNAME, etc.)
    pub rclass: u16,      // Record class (usually IN for Internet)
    pub ttl: u32,         // Time to live in seconds
    pub rdlength: u16,    // Length of RDATA field
    pub rdata: Vec<u8>,   // Resource data (format depends on record type)
}

impl DnsAnswer {
    /// Create a DNS answer whose RDLENGTH is taken from `rdata`
    pub fn new(
        name: DomainName,
        rtype: u16,
        rclass: u16,
        ttl: u32,
        rdata: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let rdlength = u16::try_from(rdata.len()).map_err(|_| CodecError::TooLong {
            field: "rdata",
            actual: rdata.len(),
        })?;
        Ok(DnsAnswer {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata,
        })
    }

    /// Create a DNS answer with an explicitly declared RDLENGTH
    pub fn with_rdlength(
        name: DomainName,
        rtype: u16,
        rclass: u16,
        ttl: u32,
        rdlength: u16,
        rdata: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let answer = DnsAnswer {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata,
        };
        answer.check_rdlength()?;
        Ok(answer)
    }

    /// Create an A record (IPv4 address) answer
    pub fn new_a_record(name: DomainName, ttl: u32, ip: Ipv4Addr) -> Self {
        DnsAnswer {
            name,
            rtype: RecordType::A.to_u16(),
            rclass: RecordClass::IN.to_u16(),
            ttl,
            rdlength: 4,
            rdata: ip.octets().to_vec(),
        }
    }

    pub fn encoded_len(&self, ttl_width: TtlWidth) -> usize {
        self.name.encoded_len() + 2 + 2 + ttl_width.field_len() + 2 + self.rdata.len()
    }

    /// Convert the answer to bytes
    pub fn to_bytes(&self, ttl_width: TtlWidth) -> Result<Bytes, CodecError> {
        self.check_rdlength()?;
        if ttl_width == TtlWidth::Legacy16 && self.ttl > u16::MAX as u32 {
            return Err(CodecError::TtlOutOfRange { ttl: self.ttl });
        }

        Ok(build_exact(self.encoded_len(ttl_width), |buf| {
            self.name.write_to(buf);
            buf.put_u16(self.rtype);
            buf.put_u16(self.rclass);
            match ttl_width {
                TtlWidth::Rfc1035 => buf.put_u32(self.ttl),
                TtlWidth::Legacy16 => buf.put_u16(self.ttl as u16),
            }
            buf.put_u16(self.rdlength);
            buf.put_slice(&self.rdata);
        }))
    }

    fn check_rdlength(&self) -> Result<(), CodecError> {
        if self.rdlength as usize != self.rdata.len() {
            return Err(CodecError::RDLengthMismatch {
                rdlength: self.rdlength as usize,
                actual: self.rdata.len(),
            });
        }
        Ok(())
    }
}

/// Serialize a whole answer section, preserving record order
pub fn encode_answers(answers: &[DnsAnswer], ttl_width: TtlWidth) -> Result<Bytes, CodecError> {
    let mut section = BytesMut::new();
    for answer in answers {
        section.extend_from_slice(&answer.to_bytes(ttl_width)?);
    }
    Ok(section.freeze())
}
