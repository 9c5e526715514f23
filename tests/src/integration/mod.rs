//! Cross-crate choreography tests.

pub mod e2e_messaging;
