//! Server-Sent Events framing

use crate::utils::error::Result;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpResponse, web};
use futures::stream::Stream;

/// Terminal data line sent after the last event
pub const DONE: &str = "[DONE]";

/// One SSE frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub event: Option<String>,
    pub data: String,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(mut self, event: &str) -> Self {
        self.event = Some(event.to_string());
        self
    }

    pub fn data(mut self, data: &str) -> Self {
        self.data = data.to_string();
        self
    }

    /// Named event carrying `payload` as JSON
    pub fn json<T: serde::Serialize>(event: &str, payload: &T) -> Result<Self> {
        Ok(Self::new().event(event).data(&serde_json::to_string(payload)?))
    }

    pub fn done() -> Self {
        Self::new().data(DONE)
    }

    pub fn to_bytes(&self) -> web::Bytes {
        let mut frame = String::new();
        if let Some(event) = &self.event {
            frame.push_str("event: ");
            frame.push_str(event);
            frame.push('\n');
        }
        for line in self.data.lines() {
            frame.push_str("data: ");
            frame.push_str(line);
            frame.push('\n');
        }
        if self.data.is_empty() {
            frame.push_str("data: \n");
        }
        frame.push('\n');
        web::Bytes::from(frame)
    }
}

/// Wrap a byte stream as a `text/event-stream` response
pub fn create_sse_response<S>(stream: S) -> HttpResponse
where
    S: Stream<Item = Result<web::Bytes>> + 'static,
{
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(stream)
}
