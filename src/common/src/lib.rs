pub mod constants;
pub mod matcher;
pub mod signatures;
pub mod types;
pub mod yaml;
