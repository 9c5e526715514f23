//! # End-to-End Messaging Tests
//!
//! Tests the complete publish/receive choreography:
//!
//! ```text
//! [Pipeline] ──create_topic──→ [In-Memory Topic Bus]
//!     │                               │
//!     ├──subscribe(from 0)───────────→│
//!     ├──await_ready──────────────────│
//!     ├──encode + publish (throttled)→│
//!     │                               │ stamps consensus ts + seq
//!     ←──deliver in consensus order───┤
//!     │ decode → filter → count       │
//!     ↓                               │
//! Complete when counter == queued     │
//! ```
//!
//! ## Test Categories
//!
//! 1. **Happy Path**: plaintext and encrypted full runs
//! 2. **Confidentiality**: wire payloads are ciphertext, foreign keys fail
//! 3. **Resource Handling**: subscription released after the run

// =============================================================================
// TEST FIXTURES (only compiled during tests)
// =============================================================================

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use parking_lot::Mutex;

#[cfg(test)]
use delivery_pipeline::{
    DeliveryPipelineService, DeliveryRecord, DeliverySink, MessagingPipeline, PipelineConfig,
    PipelinePhase,
};

#[cfg(test)]
use shared_envelope::{EnvelopeCodec, EnvelopeError, SecretKey};

#[cfg(test)]
use topic_bus::{InMemoryTopicBus, TopicChannel};

/// Sink that records every delivery for assertions.
#[cfg(test)]
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<DeliveryRecord>>,
    received: Mutex<Vec<DeliveryRecord>>,
}

#[cfg(test)]
impl DeliverySink for RecordingSink {
    fn message_sent(&self, record: &DeliveryRecord) {
        self.sent.lock().push(record.clone());
    }

    fn message_received(&self, record: &DeliveryRecord) {
        self.received.lock().push(record.clone());
    }
}

/// Build a pipeline over a fresh in-memory bus.
#[cfg(test)]
fn pipeline(
    messages: &[&str],
    filter_keyword: &str,
    codec: EnvelopeCodec,
) -> (
    DeliveryPipelineService<InMemoryTopicBus, RecordingSink>,
    Arc<InMemoryTopicBus>,
    Arc<RecordingSink>,
) {
    let bus = Arc::new(InMemoryTopicBus::new());
    let sink = Arc::new(RecordingSink::default());
    let service = DeliveryPipelineService::new(
        PipelineConfig {
            messages: messages.iter().map(|s| (*s).to_string()).collect(),
            filter_keyword: filter_keyword.to_string(),
            send_delay: Duration::from_millis(5),
        },
        codec,
        bus.clone(),
        sink.clone(),
    );
    (service, bus, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const RUN_TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_plaintext_end_to_end() {
        let (service, bus, sink) = pipeline(
            &["Hello, Hedera!", "Learning HCS", "Message 3"],
            "",
            EnvelopeCodec::passthrough(),
        );

        let report = timeout(RUN_TIMEOUT, service.run())
            .await
            .expect("run timed out")
            .expect("run failed");

        assert_eq!(report.sent, 3);
        assert_eq!(report.received, 3);
        assert_eq!(service.phase(), PipelinePhase::Complete);
        assert_eq!(bus.messages_published(), 3);

        let sent: Vec<String> = sink.sent.lock().iter().map(|r| r.text.clone()).collect();
        let received: Vec<String> = sink.received.lock().iter().map(|r| r.text.clone()).collect();
        assert_eq!(sent, received);
        assert_eq!(sent, vec!["Hello, Hedera!", "Learning HCS", "Message 3"]);
    }

    #[tokio::test]
    async fn test_encrypted_end_to_end() {
        let (service, bus, sink) = pipeline(
            &["Hello, Hedera!", "Learning HCS", "Message 3"],
            "",
            EnvelopeCodec::new(SecretKey::generate()),
        );

        let report = timeout(RUN_TIMEOUT, service.run())
            .await
            .expect("run timed out")
            .expect("run failed");
        assert_eq!(report.received, 3);

        // Wire payloads are opaque envelopes: at least IV + tag longer than
        // the plaintext, and not equal to it.
        let mut wire = bus.subscribe(report.topic, 0).await.unwrap();
        let first = wire.recv().await.unwrap();
        assert!(first.payload.len() >= b"Hello, Hedera!".len() + 32);
        assert_ne!(first.payload, b"Hello, Hedera!");

        // A consumer holding a different key cannot read them.
        let foreign = EnvelopeCodec::new(SecretKey::generate());
        assert!(matches!(
            foreign.decode(&first.payload),
            Err(EnvelopeError::AuthenticationFailed)
        ));

        // The pipeline's own records carry the decrypted plaintext.
        let received: Vec<String> = sink.received.lock().iter().map(|r| r.text.clone()).collect();
        assert_eq!(received, vec!["Hello, Hedera!", "Learning HCS", "Message 3"]);
    }

    #[tokio::test]
    async fn test_filter_matching_all_messages_completes() {
        let (service, _bus, sink) = pipeline(
            &["topic update 1", "topic update 2"],
            "topic",
            EnvelopeCodec::passthrough(),
        );

        let report = timeout(RUN_TIMEOUT, service.run())
            .await
            .expect("run timed out")
            .expect("run failed");

        assert_eq!(report.received, 2);
        assert_eq!(
            sink.received.lock().iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[tokio::test]
    async fn test_received_consensus_timestamps_are_ordered() {
        let (service, _bus, sink) = pipeline(
            &["A", "B", "C"],
            "",
            EnvelopeCodec::passthrough(),
        );

        timeout(RUN_TIMEOUT, service.run())
            .await
            .expect("run timed out")
            .expect("run failed");

        // `YYYY-MM-DD HH:MM:SS` sorts lexicographically.
        let received = sink.received.lock();
        assert!(received.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_subscription_released_on_completion() {
        let (service, bus, _sink) = pipeline(&["one"], "", EnvelopeCodec::passthrough());

        let report = timeout(RUN_TIMEOUT, service.run())
            .await
            .expect("run timed out")
            .expect("run failed");

        assert_eq!(bus.subscriber_count(report.topic), 0);
    }

    #[tokio::test]
    async fn test_console_sink_wiring_runs() {
        // Exercise the runtime's console adapter through a full run.
        let bus = Arc::new(InMemoryTopicBus::new());
        let sink = Arc::new(messenger_runtime::adapters::ConsoleSink::new());
        let service = DeliveryPipelineService::new(
            PipelineConfig {
                messages: vec!["console check".to_string()],
                filter_keyword: String::new(),
                send_delay: Duration::from_millis(1),
            },
            EnvelopeCodec::passthrough(),
            bus,
            sink,
        );

        let report = timeout(RUN_TIMEOUT, service.run())
            .await
            .expect("run timed out")
            .expect("run failed");
        assert_eq!(report.received, 1);
    }
}
