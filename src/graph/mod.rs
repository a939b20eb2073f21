//! Graph representation and algorithms module

pub mod store;
pub mod builder;
pub mod algorithms;

pub use store::RelationGraph;
pub use builder::{FollowRecord, GraphBuilder};
