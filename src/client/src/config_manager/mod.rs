mod config;

pub use config::{Config, ConfigLoader, ConfigOverrides};
