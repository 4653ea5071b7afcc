//! Observability for fieldgate
//!
//! Structured JSON logging with typed lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation outcomes
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use fieldgate::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::SchemaRegistered, &[("schema", "person")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Verifies no panic
        log_event_with_fields(Event::SchemasLoaded, &[]);
        log_event_with_fields(Event::SchemaRegistered, &[("schema", "person")]);
    }
}
