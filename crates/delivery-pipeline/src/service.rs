//! # Delivery Pipeline Service
//!
//! The main service implementation sequencing publishes and inbound
//! consumption against a topic channel.
//!
//! ## Architecture
//!
//! This service implements the inbound port:
//! - [`MessagingPipeline`]: full run choreography
//!
//! It depends on two outbound collaborators:
//! - [`TopicChannel`]: the external pub/sub channel (adapter chosen by the
//!   runtime; in-memory bus in tests)
//! - [`DeliverySink`]: operator-visible sent/received records
//!
//! ## Choreography
//!
//! 1. Create topic.
//! 2. Subscribe from the beginning of the topic's life. Subscribing before
//!    any publish is a hard precondition: it removes the race between the
//!    subscription and the channel's propagation delay.
//! 3. Wait for channel readiness.
//! 4. Interleave the publish loop (throttled, sequential) with the receive
//!    loop (decode, filter, count) cooperatively in one task.
//! 5. Terminate when the accepted-message counter reaches the number of
//!    messages queued for send. The subscription is released exactly once,
//!    on either the completion or the error path.
//!
//! A channel-level error on either path aborts the run; there are no
//! retries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use async_trait::async_trait;
use shared_envelope::EnvelopeCodec;
use topic_bus::{TopicChannel, TopicId, TopicSubscription};

use crate::domain::{
    format_timestamp, DeliveryRecord, KeywordFilter, PipelineConfig, PipelinePhase, PipelineReport,
};
use crate::events::PipelineError;
use crate::ports::inbound::MessagingPipeline;
use crate::ports::outbound::DeliverySink;

/// Sentinel surfaced to the operator when an inbound envelope fails
/// authentication (wrong key, tampered data, or non-envelope input).
pub const DECRYPT_FAILED_PLACEHOLDER: &str = "[decryption failed: invalid key or data]";

/// Delivery pipeline service.
///
/// ## Thread Safety
///
/// The service is thread-safe and can be shared across async tasks via
/// `Arc`, though a run is a single logical thread of control: the publish
/// and receive paths interleave cooperatively inside `run`, and the
/// accepted-message counter is owned by the receive path alone. The codec
/// holds only read-only key material, so both paths use it freely.
pub struct DeliveryPipelineService<C, S>
where
    C: TopicChannel,
    S: DeliverySink,
{
    /// Run configuration.
    config: PipelineConfig,
    /// Inbound keyword filter, derived from the configuration.
    filter: KeywordFilter,
    /// Envelope codec (active or pass-through).
    codec: EnvelopeCodec,
    /// The external topic channel.
    channel: Arc<C>,
    /// Operator-visible record sink.
    sink: Arc<S>,
    /// Lifecycle phase of the current run.
    phase: RwLock<PipelinePhase>,
}

impl<C, S> DeliveryPipelineService<C, S>
where
    C: TopicChannel,
    S: DeliverySink,
{
    pub fn new(config: PipelineConfig, codec: EnvelopeCodec, channel: Arc<C>, sink: Arc<S>) -> Self {
        Self {
            filter: KeywordFilter::new(config.filter_keyword.clone()),
            config,
            codec,
            channel,
            sink,
            phase: RwLock::new(PipelinePhase::Idle),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> PipelinePhase {
        *self.phase.read()
    }

    /// Advance the lifecycle phase, validating the transition.
    fn transition(&self, next: PipelinePhase) -> Result<(), PipelineError> {
        let mut phase = self.phase.write();
        if !phase.can_transition(next) {
            return Err(PipelineError::InvalidTransition {
                from: *phase,
                to: next,
            });
        }
        debug!(from = %*phase, to = %next, "Pipeline phase transition");
        *phase = next;
        Ok(())
    }

    /// Mark the run failed, if the current phase allows it.
    fn mark_failed(&self) {
        let mut phase = self.phase.write();
        if phase.can_transition(PipelinePhase::Failed) {
            *phase = PipelinePhase::Failed;
        }
    }

    async fn execute(&self) -> Result<PipelineReport, PipelineError> {
        let topic = self
            .channel
            .create_topic()
            .await
            .map_err(PipelineError::CreateTopic)?;
        info!(topic = %topic, "Topic created");

        // Subscribe before any publish: hard precondition, not an
        // optimization.
        let mut subscription = self
            .channel
            .subscribe(topic, 0)
            .await
            .map_err(PipelineError::Subscribe)?;
        self.transition(PipelinePhase::Subscribed)?;

        self.channel
            .await_ready(topic)
            .await
            .map_err(PipelineError::Readiness)?;
        self.transition(PipelinePhase::Running)?;
        info!(topic = %topic, expected = self.config.expected_count(), "Pipeline running");

        // Cooperative interleaving in one task. try_join! short-circuits:
        // a publish failure stops the receive path from waiting on messages
        // that will never arrive, and vice versa.
        let (sent, received) = tokio::try_join!(
            self.publish_all(topic),
            self.receive_all(&mut subscription)
        )?;

        // Release the channel subscription on the happy path; the error
        // path releases it when `subscription` leaves scope above.
        drop(subscription);
        self.transition(PipelinePhase::Complete)?;
        info!(topic = %topic, sent, received, "Pipeline complete");

        Ok(PipelineReport {
            topic,
            sent,
            received,
        })
    }

    /// Publish the configured messages in order, one at a time.
    async fn publish_all(&self, topic: TopicId) -> Result<usize, PipelineError> {
        let mut last_local = DateTime::<Utc>::MIN_UTC;

        for (index, text) in self.config.messages.iter().enumerate() {
            let payload = self
                .codec
                .encode(text.as_bytes())
                .map_err(PipelineError::Encode)?;

            let sequence = self
                .channel
                .publish(topic, payload)
                .await
                .map_err(|source| PipelineError::Publish { index, source })?;

            // Local send time, clamped so the operator log is monotone even
            // if the wall clock steps backwards.
            let local = Utc::now().max(last_local);
            last_local = local;

            debug!(topic = %topic, seq = sequence, "Message submitted");
            self.sink.message_sent(&DeliveryRecord {
                index: index + 1,
                text: text.clone(),
                timestamp: format_timestamp(local),
            });

            // Throttle between submissions, not after the last one.
            if index + 1 < self.config.messages.len() {
                tokio::time::sleep(self.config.send_delay).await;
            }
        }

        Ok(self.config.messages.len())
    }

    /// Consume inbound messages until the accepted count reaches the
    /// expected count.
    async fn receive_all(
        &self,
        subscription: &mut TopicSubscription,
    ) -> Result<usize, PipelineError> {
        let expected = self.config.expected_count();
        let mut accepted = 0usize;

        while accepted < expected {
            let Some(message) = subscription.recv().await else {
                return Err(PipelineError::ChannelClosed {
                    received: accepted,
                    expected,
                });
            };

            let text = match self.codec.decode(&message.payload) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    // Recoverable: surface a placeholder, keep consuming.
                    warn!(
                        seq = message.sequence_number,
                        error = %err,
                        "Inbound envelope failed to decode"
                    );
                    DECRYPT_FAILED_PLACEHOLDER.to_string()
                }
            };

            // Silent discard: no count, no record.
            if !self.filter.matches(&text) {
                continue;
            }

            accepted += 1;
            self.sink.message_received(&DeliveryRecord {
                index: accepted,
                text,
                timestamp: format_timestamp(message.consensus_timestamp),
            });
        }

        Ok(accepted)
    }
}

#[async_trait]
impl<C, S> MessagingPipeline for DeliveryPipelineService<C, S>
where
    C: TopicChannel,
    S: DeliverySink,
{
    async fn run(&self) -> Result<PipelineReport, PipelineError> {
        match self.execute().await {
            Ok(report) => Ok(report),
            Err(err) => {
                self.mark_failed();
                Err(err)
            }
        }
    }

    fn phase(&self) -> PipelinePhase {
        DeliveryPipelineService::phase(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use shared_envelope::SecretKey;
    use std::time::Duration;
    use tokio::time::timeout;
    use topic_bus::InMemoryTopicBus;

    /// Sink that records every delivery for assertions.
    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<DeliveryRecord>>,
        received: Mutex<Vec<DeliveryRecord>>,
    }

    impl DeliverySink for RecordingSink {
        fn message_sent(&self, record: &DeliveryRecord) {
            self.sent.lock().push(record.clone());
        }

        fn message_received(&self, record: &DeliveryRecord) {
            self.received.lock().push(record.clone());
        }
    }

    fn service(
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
        let config = PipelineConfig {
            messages: messages.iter().map(|s| (*s).to_string()).collect(),
            filter_keyword: filter_keyword.to_string(),
            send_delay: Duration::from_millis(5),
        };
        let svc = DeliveryPipelineService::new(config, codec, bus.clone(), sink.clone());
        (svc, bus, sink)
    }

    #[tokio::test]
    async fn test_full_run_plaintext() {
        let (svc, _bus, sink) = service(
            &["Hello, Hedera!", "Learning HCS", "Message 3"],
            "",
            EnvelopeCodec::passthrough(),
        );

        let report = timeout(Duration::from_secs(5), svc.run())
            .await
            .expect("timeout")
            .expect("run");

        assert_eq!(report.sent, 3);
        assert_eq!(report.received, 3);
        assert_eq!(svc.phase(), PipelinePhase::Complete);

        let received = sink.received.lock();
        let texts: Vec<&str> = received.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello, Hedera!", "Learning HCS", "Message 3"]);
        assert_eq!(
            received.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn test_full_run_encrypted_roundtrips() {
        let codec = EnvelopeCodec::new(SecretKey::generate());
        let (svc, bus, sink) = service(&["Hello, Hedera!", "Learning HCS"], "", codec);

        let report = timeout(Duration::from_secs(5), svc.run())
            .await
            .expect("timeout")
            .expect("run");
        assert_eq!(report.received, 2);

        // The wire payloads are ciphertext, not the plaintext
        let mut sub = bus.subscribe(report.topic, 0).await.unwrap();
        let wire = sub.recv().await.unwrap();
        assert_ne!(wire.payload, b"Hello, Hedera!");

        let texts: Vec<String> = sink.received.lock().iter().map(|r| r.text.clone()).collect();
        assert_eq!(texts, vec!["Hello, Hedera!", "Learning HCS"]);
    }

    #[tokio::test]
    async fn test_filter_counts_only_matches() {
        // Exercise the receive path with an inbound sequence where only one
        // message matches the predicate.
        let (svc, bus, sink) = service(&["expected-one"], "Hedera", EnvelopeCodec::passthrough());

        let topic = bus.create_topic().await.unwrap();
        for text in ["Hello, Hedera!", "Learning HCS", "Message 3"] {
            bus.publish(topic, text.as_bytes().to_vec()).await.unwrap();
        }

        let mut sub = bus.subscribe(topic, 0).await.unwrap();
        let accepted = timeout(Duration::from_secs(1), svc.receive_all(&mut sub))
            .await
            .expect("timeout")
            .expect("receive");

        assert_eq!(accepted, 1);
        let received = sink.received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].text, "Hello, Hedera!");
        assert_eq!(received[0].index, 1);
    }

    #[tokio::test]
    async fn test_termination_ignores_surplus_messages() {
        let (svc, bus, sink) = service(&["a", "b", "c"], "", EnvelopeCodec::passthrough());

        let topic = bus.create_topic().await.unwrap();
        for text in ["m1", "m2", "m3", "m4"] {
            bus.publish(topic, text.as_bytes().to_vec()).await.unwrap();
        }

        let mut sub = bus.subscribe(topic, 0).await.unwrap();
        let accepted = svc.receive_all(&mut sub).await.unwrap();

        assert_eq!(accepted, 3);
        assert_eq!(sink.received.lock().len(), 3);

        // The fourth message was delivered but never processed
        let surplus = sub.try_recv().unwrap().expect("fourth message pending");
        assert_eq!(surplus.payload, b"m4");
    }

    #[tokio::test]
    async fn test_tampered_envelope_surfaces_placeholder_and_continues() {
        let codec = EnvelopeCodec::new(SecretKey::generate());
        let (svc, bus, sink) = service(&["x", "y"], "", codec.clone());

        let topic = bus.create_topic().await.unwrap();
        // Garbage that is long enough to parse as an envelope but fails the
        // tag check, followed by a genuine envelope.
        bus.publish(topic, vec![0u8; 48]).await.unwrap();
        bus.publish(topic, codec.encode(b"real message").unwrap())
            .await
            .unwrap();

        let mut sub = bus.subscribe(topic, 0).await.unwrap();
        let accepted = svc.receive_all(&mut sub).await.unwrap();

        assert_eq!(accepted, 2);
        let received = sink.received.lock();
        assert_eq!(received[0].text, DECRYPT_FAILED_PLACEHOLDER);
        assert_eq!(received[1].text, "real message");
    }

    #[tokio::test]
    async fn test_send_timestamps_monotone() {
        let (svc, _bus, sink) = service(&["A", "B", "C"], "", EnvelopeCodec::passthrough());

        timeout(Duration::from_secs(5), svc.run())
            .await
            .expect("timeout")
            .expect("run");

        // The format is lexicographically ordered, so string comparison
        // checks chronology.
        let sent = sink.sent.lock();
        assert_eq!(sent.len(), 3);
        assert!(sent.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_empty_message_list_completes_immediately() {
        let (svc, _bus, sink) = service(&[], "", EnvelopeCodec::passthrough());

        let report = timeout(Duration::from_secs(1), svc.run())
            .await
            .expect("timeout")
            .expect("run");

        assert_eq!(report.sent, 0);
        assert_eq!(report.received, 0);
        assert_eq!(svc.phase(), PipelinePhase::Complete);
        assert!(sink.received.lock().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_released_after_run() {
        let (svc, bus, _sink) = service(&["one"], "", EnvelopeCodec::passthrough());

        let report = timeout(Duration::from_secs(5), svc.run())
            .await
            .expect("timeout")
            .expect("run");

        assert_eq!(bus.subscriber_count(report.topic), 0);
    }
}
