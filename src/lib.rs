pub mod command;
pub mod config;
pub mod engine;
pub mod grid;
pub mod pattern;
pub mod render;
pub mod rule_set;
