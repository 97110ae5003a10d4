//! Wire encoding for a DNS server that answers every query with one
//! configured A record.

pub mod dns_header;
pub mod dns_message;
pub mod dns_question_and_answer;
pub mod error;
pub mod local;
pub mod server;
mod wire;

pub use error::CodecError;
