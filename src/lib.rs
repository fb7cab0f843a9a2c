//! Security group relationship mapper: builds a directed graph from cloud
//! security group records and renders it as DOT or JSON.

pub mod config;
pub mod formatters;
pub mod graph_builder;
pub mod types;
pub mod utils;

pub use config::MapperConfig;
pub use formatters::{Renderer, renderer_for};
pub use graph_builder::SgGraph;
