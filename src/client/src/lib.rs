pub mod config_manager;
pub mod exporters;
pub mod monitor;
pub mod tracker;
pub mod watchdog_client;

pub use watchdog_client::WatchdogClient;
