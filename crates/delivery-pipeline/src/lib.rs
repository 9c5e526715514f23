//! # Delivery Pipeline
//!
//! Sequences outbound publishes and inbound consumption against a
//! consensus topic channel, applying the envelope codec and a keyword
//! filter, and deciding termination.
//!
//! ## Architecture Role
//!
//! ```text
//! [Runtime] ──run()──→ [Delivery Pipeline]
//!                         │          ↑
//!              encode + publish    subscribe + decode + filter
//!                         ↓          │
//!                      [Topic Channel (external)]
//! ```
//!
//! ## Ordering
//!
//! The pipeline subscribes **before** publishing and waits for the channel
//! to acknowledge readiness, so the subscription cannot race the channel's
//! propagation delay. Delivered order within the subscription is
//! authoritative; the pipeline never reorders.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::{
    format_timestamp, DeliveryRecord, KeywordFilter, PipelineConfig, PipelinePhase, PipelineReport,
};
pub use events::PipelineError;
pub use ports::inbound::MessagingPipeline;
pub use ports::outbound::DeliverySink;
pub use service::{DeliveryPipelineService, DECRYPT_FAILED_PLACEHOLDER};
