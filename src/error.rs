use thiserror::Error;

/// Errors raised while building or serializing a DNS message.
///
/// All of these describe a message that would violate the wire format, so
/// callers should abort the message rather than try to repair it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid domain name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Header field {field} value {value} exceeds maximum {max}")]
    InvalidFlagField {
        field: &'static str,
        value: u8,
        max: u8,
    },

    #[error("RDLENGTH {rdlength} does not match RDATA length {actual}")]
    RDLengthMismatch { rdlength: usize, actual: usize },

    #[error("Header declares {declared} {section} entries but {actual} were supplied")]
    CountMismatch {
        section: &'static str,
        declared: u16,
        actual: usize,
    },

    #[error("{field} of {actual} does not fit in a 16-bit field")]
    TooLong { field: &'static str, actual: usize },

    #[error("TTL {ttl} does not fit in a 16-bit field")]
    TtlOutOfRange { ttl: u32 },
}
