use bytes::{Bytes, BytesMut};

use crate::dns_header::{DnsHeader, HEADER_LEN};
use crate::dns_question_and_answer::{encode_answers, DnsAnswer, DnsQuestion, TtlWidth};
use crate::error::CodecError;

/// A complete outgoing message: header, questions and answers.
///
/// Authority and additional sections are never carried, so their header
/// counts must stay zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsAnswer>,
}

impl DnsMessage {
    pub fn encode(&self, ttl_width: TtlWidth) -> Result<Bytes, CodecError> {
        check_count("authority", self.header.authority_count, 0)?;
        check_count("additional", self.header.additional_count, 0)?;
        assemble_with(&self.header, &self.questions, &self.answers, ttl_width)
    }
}

/// Build the complete DNS response message with RFC 1035 TTLs
pub fn assemble(
    header: &DnsHeader,
    questions: &[DnsQuestion],
    answers: &[DnsAnswer],
) -> Result<Bytes, CodecError> {
    assemble_with(header, questions, answers, TtlWidth::Rfc1035)
}

/// Build the complete DNS response message
///
/// The header counts are checked against the sections before anything is
/// written.
pub fn assemble_with(
    header: &DnsHeader,
    questions: &[DnsQuestion],
    answers: &[DnsAnswer],
    ttl_width: TtlWidth,
) -> Result<Bytes, CodecError> {
    check_count("question", header.question_count, questions.len())?;
    check_count("answer", header.answer_count, answers.len())?;

    let answer_section = encode_answers(answers, ttl_width)?;
    let question_len: usize = questions.iter().map(DnsQuestion::encoded_len).sum();

    let mut response = BytesMut::with_capacity(HEADER_LEN + question_len + answer_section.len());

    // Add header
    response.extend_from_slice(&header.to_bytes());

    // Add questions
    for question in questions {
        response.extend_from_slice(&question.to_bytes());
    }

    // Add answers
    response.extend_from_slice(&answer_section);

    Ok(response.freeze())
}

fn check_count(section: &'static str, declared: u16, actual: usize) -> Result<(), CodecError> {
    if declared as usize != actual {
        return Err(CodecError::CountMismatch {
            section,
            declared,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::dns_header::DnsFlags;
    use crate::dns_question_and_answer::{DomainName, RecordClass, RecordType};

    fn header(question_count: u16, answer_count: u16) -> DnsHeader {
        DnsHeader {
            id: 1234,
            flags: 0x8000,
            question_count,
            answer_count,
            authority_count: 0,
            additional_count: 0,
        }
    }

    fn codecrafters() -> DomainName {
        DomainName::new("codecrafters.io").unwrap()
    }

    fn question() -> DnsQuestion {
        DnsQuestion::new(codecrafters(), RecordType::A, RecordClass::IN)
    }

    fn answer() -> DnsAnswer {
        DnsAnswer::new_a_record(codecrafters(), 60, Ipv4Addr::new(8, 8, 8, 8))
    }

    #[test]
    fn test_codecrafters_response_bytes() {
        let bytes = assemble(&header(1, 1), &[question()], &[answer()]).unwrap();

        let mut label = vec![12];
        label.extend_from_slice(b"codecrafters");
        label.push(2);
        label.extend_from_slice(b"io");
        label.push(0);

        let mut expected = vec![0x04, 0xD2, 0x80, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
        expected.extend_from_slice(&label);
        expected.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        expected.extend_from_slice(&label);
        expected.extend_from_slice(&[
            0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x04, 0x08, 0x08, 0x08, 0x08,
        ]);

        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_assemble_is_plain_concatenation() {
        let questions = [question(), DnsQuestion::new(DomainName::root(), RecordType::NS, RecordClass::IN)];
        let answers = [answer()];
        let header = header(2, 1);

        let bytes = assemble_with(&header, &questions, &answers, TtlWidth::Legacy16).unwrap();

        let mut expected = header.to_bytes().to_vec();
        for question in &questions {
            expected.extend_from_slice(&question.to_bytes());
        }
        expected.extend_from_slice(&answers[0].to_bytes(TtlWidth::Legacy16).unwrap());
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_count_mismatch() {
        assert_eq!(
            assemble(&header(2, 1), &[question()], &[answer()]),
            Err(CodecError::CountMismatch { section: "question", declared: 2, actual: 1 })
        );
        assert_eq!(
            assemble(&header(1, 0), &[question()], &[answer()]),
            Err(CodecError::CountMismatch { section: "answer", declared: 0, actual: 1 })
        );
    }

    #[test]
    fn test_answer_errors_propagate() {
        let mut broken = answer();
        broken.rdlength = 16;
        assert!(matches!(
            assemble(&header(1, 1), &[question()], &[broken]),
            Err(CodecError::RDLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_message_rejects_unsupported_sections() {
        let mut message = DnsMessage {
            header: header(1, 1),
            questions: vec![question()],
            answers: vec![answer()],
        };
        message.header.additional_count = 1;

        assert!(matches!(
            message.encode(TtlWidth::Rfc1035),
            Err(CodecError::CountMismatch { section: "additional", .. })
        ));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let questions = vec![question()];
        let answers = vec![answer()];
        let message = DnsMessage {
            header: DnsHeader::for_sections(77, DnsFlags::response(), &questions, &answers).unwrap(),
            questions,
            answers,
        };

        assert_eq!(
            message.encode(TtlWidth::Rfc1035).unwrap(),
            message.encode(TtlWidth::Rfc1035).unwrap()
        );
    }
}
