pub mod commands;
pub mod format;
pub mod graph;
pub mod http;
pub mod package;
pub mod plan;
pub mod platform;
pub mod runtime;
