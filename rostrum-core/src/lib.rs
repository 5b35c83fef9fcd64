pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod snapshot;
pub mod text;

pub use analysis::Analyzer;
pub use config::RostrumConfig;
pub use error::CoreError;
pub use query::{filter_talks, find_talk, TalkFilter};
