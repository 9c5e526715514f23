//! # Consensus Topic Messenger
//!
//! Creates a topic on the channel, subscribes to it, publishes the
//! configured messages (optionally envelope-encrypted), and consumes them
//! back with optional keyword filtering.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration from the environment (missing credentials abort
//!    before any channel action)
//! 3. Build the envelope codec (invalid key material warns and runs
//!    plaintext)
//! 4. Wire channel, codec, and console sink into the delivery pipeline
//! 5. Run and map the outcome to exit codes: `0` when all expected
//!    messages were received, `1` on a channel error

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use delivery_pipeline::{DeliveryPipelineService, MessagingPipeline, PipelineConfig};
use messenger_runtime::adapters::ConsoleSink;
use messenger_runtime::config::MessengerConfig;
use shared_envelope::EnvelopeCodec;
use topic_bus::InMemoryTopicBus;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Consensus Topic Messenger v0.1.0");
    info!("===========================================");

    // Load configuration; missing credentials abort before any channel
    // action.
    let config = match MessengerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuration error: {err}");
            std::process::exit(1);
        }
    };
    info!(account = %config.operator.account_id, "Operator credentials loaded");

    let codec = if config.use_encryption {
        EnvelopeCodec::from_key_material(&config.encryption_key)
    } else {
        EnvelopeCodec::passthrough()
    };
    info!(
        encryption = codec.is_active(),
        filter = %if config.filter_keyword.is_empty() { "<none>" } else { &config.filter_keyword },
        messages = config.messages_to_send.len(),
        "Messenger configured"
    );

    // Single-process channel; a remote ledger adapter would be configured
    // with `config.propagation_delay` as its readiness fallback.
    let channel = Arc::new(InMemoryTopicBus::new());
    let sink = Arc::new(ConsoleSink::new());

    let pipeline = DeliveryPipelineService::new(
        PipelineConfig {
            messages: config.messages_to_send.clone(),
            filter_keyword: config.filter_keyword.clone(),
            send_delay: config.send_delay,
        },
        codec,
        channel,
        sink,
    );

    match pipeline.run().await {
        Ok(report) => {
            info!(
                topic = %report.topic,
                sent = report.sent,
                received = report.received,
                "All messages received. Closing connection."
            );
            Ok(())
        }
        Err(err) => {
            error!("Pipeline error: {err}");
            std::process::exit(1);
        }
    }
}
