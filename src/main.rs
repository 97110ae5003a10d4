use std::net::Ipv4Addr;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fixed_answer_dns::dns_question_and_answer::TtlWidth;
use fixed_answer_dns::local::AnswerConfig;
use fixed_answer_dns::server::DnsServer;

#[derive(Parser, Debug)]
#[command(name = "dns-server")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:2053")]
    bind: String,

    /// Message ID written into every response
    #[arg(long, default_value_t = 1234)]
    id: u16,

    /// Domain name placed in the question and answer
    #[arg(long, default_value = "codecrafters.io")]
    name: String,

    /// TTL of the answer in seconds
    #[arg(long, default_value_t = 60)]
    ttl: u32,

    /// IPv4 address returned in the A record
    #[arg(long, default_value = "8.8.8.8")]
    address: Ipv4Addr,

    /// Write the TTL as 16 bits instead of 32
    #[arg(long)]
    legacy_ttl16: bool,
}

impl Args {
    fn answer_config(&self) -> AnswerConfig {
        AnswerConfig {
            id: self.id,
            name: self.name.clone(),
            ttl: self.ttl,
            address: self.address,
            ttl_width: if self.legacy_ttl16 {
                TtlWidth::Legacy16
            } else {
                TtlWidth::Rfc1035
            },
        }
    }
}

/// Log level comes from RUST_LOG, defaulting to info.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let config = args.answer_config();

    let server = DnsServer::new(&args.bind, &config)?;
    info!(
        bind = %server.local_addr()?,
        ttl_width = ?config.ttl_width,
        "DNS server listening"
    );

    server.run();
    Ok(())
}
