//! Observability events for recordkit
//!
//! Lifecycle and request outcomes worth a log line. Events are explicit and
//! typed; the string form is stable and used as the `event` field.

use std::fmt;

/// Observable events in recordkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Schema catalogs registered
    SchemasLoaded,
    /// HTTP listener bound, ready for requests
    Serving,
    /// Server stopped
    ShutdownComplete,

    // Records
    /// Record constructed from input
    RecordConstructed,
    /// Input rejected by validation
    RecordRejected,

    // Registration
    /// User appended to the store
    UserRegistered,
    /// Store write failed
    StoreWriteFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "RECORDKIT_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::Serving => "RECORDKIT_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::RecordConstructed => "RECORD_CONSTRUCTED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::UserRegistered => "USER_REGISTERED",
            Event::StoreWriteFailed => "STORE_WRITE_FAILED",
        }
    }

    /// Returns true if this event reports a failed operation
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::StoreWriteFailed)
    }

    /// Returns true if this event reports rejected client input
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::RecordRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        for event in [
            Event::BootStart,
            Event::ConfigLoaded,
            Event::SchemasLoaded,
            Event::Serving,
            Event::ShutdownComplete,
            Event::RecordConstructed,
            Event::RecordRejected,
            Event::UserRegistered,
            Event::StoreWriteFailed,
        ] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{}", name);
        }
    }

    #[test]
    fn test_classification() {
        assert!(Event::StoreWriteFailed.is_failure());
        assert!(!Event::UserRegistered.is_failure());
        assert!(Event::RecordRejected.is_rejection());
    }
}
