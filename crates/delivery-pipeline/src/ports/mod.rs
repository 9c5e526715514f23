//! Inbound (API) and outbound (SPI) ports for the delivery pipeline.

pub mod inbound;
pub mod outbound;
