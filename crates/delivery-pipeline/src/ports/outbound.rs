//! Outbound ports (SPI) for the delivery pipeline.

use crate::domain::DeliveryRecord;

/// Operator-visible output for sent and received messages.
///
/// Implemented by the runtime (console adapter) and by tests (recording
/// sink). Sink calls happen inline on the pipeline's single logical thread
/// of control; implementations should not block.
pub trait DeliverySink: Send + Sync {
    /// A message was submitted to the channel.
    ///
    /// The record carries the literal pre-encoding text and the local send
    /// timestamp.
    fn message_sent(&self, record: &DeliveryRecord);

    /// An inbound message passed decode and filter and was counted.
    ///
    /// The record carries the accepted-message counter and the consensus
    /// timestamp.
    fn message_received(&self, record: &DeliveryRecord);
}
