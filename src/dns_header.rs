use bytes::{BufMut, Bytes};

use crate::error::CodecError;
use crate::wire::build_exact;

/// Size of the fixed DNS header on the wire.
pub const HEADER_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DnsFlags {
    pub qr: bool,              // Query/Response (false = query, true = response)
    pub opcode: u8,            // Operation code, 4 bits (0 = standard query)
    pub aa: bool,              // Authoritative Answer
    pub tc: bool,              // Truncation
    pub rd: bool,              // Recursion Desired
    pub ra: bool,              // Recursion Available
    pub z: u8,                 // Reserved, 3 bits (must be 0)
    pub rcode: u8,             // Response code, 4 bits (0 = no error)
}

impl DnsFlags {
    /// Flags for a plain response: QR set, everything else zero (0x8000).
    pub fn response() -> Self {
        DnsFlags {
            qr: true,
            ..Default::default()
        }
    }

    /// Pack the flags into the header's flag word.
    ///
    /// Multi-bit fields are range checked instead of masked, so an
    /// oversized opcode never bleeds into the neighbouring bits.
    pub fn to_u16(&self) -> Result<u16, CodecError> {
        check_width("opcode", self.opcode, 0xF)?;
        check_width("z", self.z, 0x7)?;
        check_width("rcode", self.rcode, 0xF)?;

        let mut flags: u16 = 0;

        if self.qr { flags |= 1 << 15; }           // QR at bit 15
        flags |= (self.opcode as u16) << 11;       // OPCODE at bits 11-14
        if self.aa { flags |= 1 << 10; }           // AA at bit 10
        if self.tc { flags |= 1 << 9; }            // TC at bit 9
        if self.rd { flags |= 1 << 8; }            // RD at bit 8
        if self.ra { flags |= 1 << 7; }            // RA at bit 7
        flags |= (self.z as u16) << 4;             // Z at bits 4-6 (reserved)
        flags |= self.rcode as u16;                // RCODE at bits 0-3

        Ok(flags)
    }
}

fn check_width(field: &'static str, value: u8, max: u8) -> Result<(), CodecError> {
    if value > max {
        return Err(CodecError::InvalidFlagField { field, value, max });
    }
    Ok(())
}

impl DnsHeader {
    /// Header whose question and answer counts are taken from the sections
    /// it will precede. Authority and additional sections are always empty.
    pub fn for_sections<Q, A>(
        id: u16,
        flags: DnsFlags,
        questions: &[Q],
        answers: &[A],
    ) -> Result<Self, CodecError> {
        Ok(DnsHeader {
            id,
            flags: flags.to_u16()?,
            question_count: section_count("question", questions.len())?,
            answer_count: section_count("answer", answers.len())?,
            authority_count: 0,
            additional_count: 0,
        })
    }

    /// ID, FLAGS, QDCOUNT, ANCOUNT, NSCOUNT, ARCOUNT as big-endian u16s.
    pub fn to_bytes(&self) -> Bytes {
        build_exact(HEADER_LEN, |buf| {
            buf.put_u16(self.id);
            buf.put_u16(self.flags);
            buf.put_u16(self.question_count);
            buf.put_u16(self.answer_count);
            buf.put_u16(self.authority_count);
            buf.put_u16(self.additional_count);
        })
    }
}

fn section_count(section: &'static str, len: usize) -> Result<u16, CodecError> {
    u16::try_from(len).map_err(|_| CodecError::TooLong {
        field: section,
        actual: len,
    })
}
