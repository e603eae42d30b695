//! Observability subsystem for recordkit
//!
//! Provides:
//! - Structured logging (JSON) on top of `tracing`
//! - Typed lifecycle events
//!
//! # Usage
//!
//! ```ignore
//! use recordkit::observability::{self, Event, LogFormat};
//!
//! observability::init("info", LogFormat::Json);
//! observability::log_event_with_fields(Event::UserRegistered, &[("total", "1")]);
//! ```
//!
//! Logging must never fail the operation being logged.

mod events;
mod logger;

pub use events::Event;
pub use logger::{init, log_event, log_event_with_fields, Fields, LogFormat};
