pub mod event_writer;
pub mod jsonl;

pub use event_writer::{EventWriter, LogWriterEnum};
pub use jsonl::JsonlWriter;
