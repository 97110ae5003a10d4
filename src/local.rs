use std::net::Ipv4Addr;

use crate::dns_header::{DnsFlags, DnsHeader};
use crate::dns_message::DnsMessage;
use crate::dns_question_and_answer::{
    DnsAnswer, DnsQuestion, DomainName, RecordClass, RecordType, TtlWidth,
};
use crate::error::CodecError;

/// The answer served to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerConfig {
    pub id: u16,
    pub name: String,
    pub ttl: u32,
    pub address: Ipv4Addr,
    pub ttl_width: TtlWidth,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        AnswerConfig {
            id: 1234,
            name: "codecrafters.io".to_string(),
            ttl: 60,
            address: Ipv4Addr::new(8, 8, 8, 8),
            ttl_width: TtlWidth::Rfc1035,
        }
    }
}

/// Create the response message for the configured answer
/// One A/IN question echoed back with one A/IN record for the same name
pub fn build_fixed_response(config: &AnswerConfig) -> Result<DnsMessage, CodecError> {
    let name = DomainName::new(&config.name)?;

    let questions = vec![DnsQuestion::new(name.clone(), RecordType::A, RecordClass::IN)];
    let answers = vec![DnsAnswer::new_a_record(name, config.ttl, config.address)];
    let header = DnsHeader::for_sections(config.id, DnsFlags::response(), &questions, &answers)?;

    Ok(DnsMessage {
        header,
        questions,
        answers,
    })
}
