//! Community detection and influencer ranking over follow graphs

pub mod config;
pub mod error;
pub mod data;
pub mod graph;
pub mod community;
pub mod centrality;
pub mod analysis;
pub mod storage;

pub use analysis::{analyze, analyze_batch, analyze_seeded, AnalysisReport};
pub use config::Config;
pub use error::GraphError;
