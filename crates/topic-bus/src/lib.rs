//! # Topic Bus - Consensus-Ordered Pub/Sub Channel
//!
//! Abstraction over an external append-only ordered pub/sub stream
//! ("topic"), plus an in-memory implementation for single-process
//! operation and tests.
//!
//! ## Contract
//!
//! ```text
//! ┌──────────────┐                      ┌──────────────┐
//! │  Publisher   │                      │  Subscriber  │
//! │              │    publish()         │              │
//! │              │ ──────┐              │              │
//! └──────────────┘       │              └──────────────┘
//!                        ▼                     ↑
//!                  ┌──────────────┐           │
//!                  │  Topic (log) │ ──────────┘
//!                  │ seq 1,2,3..  │  subscribe(from)
//!                  └──────────────┘
//! ```
//!
//! - Every published payload is stamped with a consensus timestamp and a
//!   per-topic sequence number (starting at 1) at publish time.
//! - A subscription delivers messages in consensus order, replaying the
//!   retained log from the requested sequence number before going live,
//!   with no duplicates or gaps at the replay/live boundary.
//! - Delivered order within a subscription is authoritative; consumers
//!   must not reorder.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod channel;
pub mod errors;
pub mod message;
pub mod subscriber;

// Re-export main types
pub use bus::InMemoryTopicBus;
pub use channel::TopicChannel;
pub use errors::ChannelError;
pub use message::{TopicId, TopicMessage};
pub use subscriber::TopicSubscription;

/// Maximum messages to buffer per subscriber before lag-dropping.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Sequence number of the first message on any topic.
pub const FIRST_SEQUENCE_NUMBER: u64 = 1;
