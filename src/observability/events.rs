//! Observable events
//!
//! Events are explicit and typed. Validation itself emits nothing; these
//! come from configuration, the schema registry and request handling.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file parsed
    ConfigLoaded,
    /// One schema added to the registry
    SchemaRegistered,
    /// Schema directory scan complete
    SchemasLoaded,
    /// Schema failed the authoring pass or could not be registered
    SchemaRejected,
    /// Request validated and answered
    RequestAccepted,
    /// Request failed validation or was malformed
    RequestRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::RequestAccepted => "REQUEST_ACCEPTED",
            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Default severity when the event is logged
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaRejected => Severity::Fatal,
            Event::RequestRejected => Severity::Warn,
            Event::ConfigLoaded
            | Event::SchemaRegistered
            | Event::SchemasLoaded
            | Event::RequestAccepted => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
