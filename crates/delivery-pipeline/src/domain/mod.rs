//! Domain types for the delivery pipeline.

mod config;
mod filter;
mod phase;
mod record;

pub use config::PipelineConfig;
pub use filter::KeywordFilter;
pub use phase::PipelinePhase;
pub use record::{format_timestamp, DeliveryRecord, PipelineReport};
