pub mod cli;
pub mod dataset;
pub mod search;
pub mod server;
pub mod targets;
