use crate::exporters::jsonl::JsonlWriter;
use aiwatch_common::types::event::AuditEvent;

use anyhow::Result;

pub enum LogWriterEnum {
    Jsonl(JsonlWriter),
}

#[allow(async_fn_in_trait)]
pub trait EventWriter {
    async fn append_event(&self, event: &AuditEvent) -> Result<()>;
}

impl EventWriter for LogWriterEnum {
    async fn append_event(&self, event: &AuditEvent) -> Result<()> {
        match self {
            LogWriterEnum::Jsonl(writer) => writer.append_event(event).await,
        }
    }
}

impl LogWriterEnum {
    pub fn variant_name(&self) -> &'static str {
        match self {
            LogWriterEnum::Jsonl(_) => "JsonlWriter",
        }
    }
}
