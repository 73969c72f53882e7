pub mod config;
pub mod errors;
pub mod graph;
pub mod mcp;
pub mod resolution;
pub mod scout;
pub mod search;
pub mod types;
pub mod vectors;
