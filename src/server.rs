use std::net::{SocketAddr, UdpSocket};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::local::{build_fixed_response, AnswerConfig};

/// Largest datagram read from a client
pub const MAX_DATAGRAM: usize = 512;

/// Pause after a failed read so a broken socket does not spin the loop
const RECV_RETRY_DELAY: Duration = Duration::from_millis(100);

/// DNS Server that answers every datagram with the configured response
pub struct DnsServer {
    socket: UdpSocket,
    response: Bytes,
}

impl DnsServer {
    /// Create a new DNS server bound to the given address
    /// The response is built and encoded up front so a bad configuration fails here
    pub fn new(bind_addr: &str, config: &AnswerConfig) -> Result<Self> {
        let message = build_fixed_response(config)
            .with_context(|| format!("Invalid answer for {}", config.name))?;
        let response = message
            .encode(config.ttl_width)
            .with_context(|| format!("Failed to encode answer for {}", config.name))?;

        for answer in &message.answers {
            info!(name = %answer.name, ttl = answer.ttl, rdata = ?answer.rdata, "Serving answer");
        }

        let socket =
            UdpSocket::bind(bind_addr).with_context(|| format!("Failed to bind to {}", bind_addr))?;

        Ok(Self { socket, response })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .context("Failed to read local address")
    }

    /// Run the DNS server main loop
    /// A failed read or send is logged and the loop carries on
    pub fn run(&self) {
        let mut buf = [0u8; MAX_DATAGRAM];

        loop {
            let (size, source) = match self.socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "Error receiving data");
                    thread::sleep(RECV_RETRY_DELAY);
                    continue;
                }
            };
            info!(bytes = size, %source, "Received datagram");

            if let Err(e) = self.respond(source) {
                error!(error = %e, %source, "Failed to answer request");
            }
        }
    }

    fn respond(&self, source: SocketAddr) -> Result<()> {
        self.socket
            .send_to(&self.response, source)
            .with_context(|| format!("Failed to send response to {}", source))?;
        debug!(bytes = self.response.len(), %source, "Sent response");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns_question_and_answer::TtlWidth;
    use crate::error::CodecError;

    #[test]
    fn test_answers_over_udp() {
        let config = AnswerConfig::default();
        let server = DnsServer::new("127.0.0.1:0", &config).unwrap();
        let server_addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());

        let client = UdpSocket::bind("127.0.0.1:0").unwrap();
        client
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let expected = build_fixed_response(&config)
            .unwrap()
            .encode(TtlWidth::Rfc1035)
            .unwrap();

        // The request body is ignored, any datagram gets the same reply
        for request in [&b"anything"[..], &[0u8; 12][..]] {
            client.send_to(request, server_addr).unwrap();
            let mut buf = [0u8; MAX_DATAGRAM];
            let (size, from) = client.recv_from(&mut buf).unwrap();
            assert_eq!(from, server_addr);
            assert_eq!(&buf[..size], &expected[..]);
        }
    }

    #[test]
    fn test_recv_retry_pauses() {
        assert!(RECV_RETRY_DELAY >= Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = AnswerConfig {
            name: ".leading.dot".to_string(),
            ..Default::default()
        };
        assert!(DnsServer::new("127.0.0.1:0", &config).is_err());
    }

    #[test]
    fn test_unencodable_config_is_fatal() {
        let config = AnswerConfig {
            ttl: 70_000,
            ttl_width: TtlWidth::Legacy16,
            ..Default::default()
        };
        let err = DnsServer::new("127.0.0.1:0", &config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::TtlOutOfRange { ttl: 70_000 })
        ));

        let rfc = AnswerConfig {
            ttl_width: TtlWidth::Rfc1035,
            ..config
        };
        assert!(DnsServer::new("127.0.0.1:0", &rfc).is_ok());
    }
}
