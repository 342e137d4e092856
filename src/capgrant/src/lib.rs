pub mod cli;
mod config;
mod report;

pub use config::Config;
