//! Echo USSD Example
//!
//! Answers every BlastSMS USSD request with the text the subscriber typed.
//! Sending `0` ends the session.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-ussd -- --config demos/echo_ussd/relay.toml
//!
//! curl 'http://127.0.0.1:8080/api/v1/blastsms/ussd?msisdn=27000&shortcode=*120%23&sessionid=s1&type=1'
//! curl 'http://127.0.0.1:8080/api/v1/blastsms/ussd?msisdn=27000&shortcode=*120%23&sessionid=s1&type=2&msg=hi'
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use relay::prelude::*;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(about = "USSD echo service behind the BlastSMS adapter")]
struct Args {
    /// Configuration file (defaults to ./relay.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile (development, production, ...).
    #[arg(short, long)]
    profile: Option<String>,
}

/// Builds the reply for one inbound message.
fn answer(message: &InboundMessage) -> OutboundMessage {
    match (message.session_event, message.content.as_deref()) {
        (SessionEvent::New, _) => message.reply("Welcome to echo. Type anything, 0 to quit.", true),
        (_, Some("0")) => message.reply("Goodbye.", false),
        (_, Some(text)) => message.reply(format!("You said: {text}"), true),
        (_, None) => message.reply("Say something.", true),
    }
}

async fn serve(mut endpoints: BusEndpoints) {
    loop {
        tokio::select! {
            Some(message) = endpoints.inbound.recv() => {
                info!(from = %message.from_addr, content = ?message.content, "USSD request");
                if endpoints.outbound.send(answer(&message)).await.is_err() {
                    warn!("Outbound queue closed");
                    break;
                }
            }
            Some(event) = endpoints.events.recv() => match event {
                DeliveryEvent::Ack { user_message_id, .. } => {
                    info!(message_id = %user_message_id, "Reply delivered");
                }
                DeliveryEvent::Nack { user_message_id, nack_reason } => {
                    warn!(message_id = %user_message_id, reason = %nack_reason, "Reply failed");
                }
            },
            else => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = RelayRuntime::builder();
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    let runtime = builder.build().context("loading configuration")?;

    runtime.register_adapter::<BlastSmsAdapter>().await?;

    let endpoints = runtime
        .take_endpoints()
        .await
        .context("bus endpoints already taken")?;
    tokio::spawn(serve(endpoints));

    runtime.run().await?;
    Ok(())
}
