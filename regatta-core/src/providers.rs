//! Read-only collaborator providers injected into the save pipeline.
//!
//! All three are pure reads of ambient facts (wall clock, product version,
//! process environment). Tests substitute fixed implementations.

use chrono::{DateTime, Utc};

/// Wall-clock provider.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Product version provider, recorded on every revision.
pub trait ProductVersion {
    fn version(&self) -> String;
}

/// Version of the running server, taken from the crate version at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerVersion;

impl ProductVersion for ServerVersion {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// Process-environment feature-flag provider.
pub trait ProcessEnv {
    /// Whether the named flag is set truthy (`1`, `true`, `yes`).
    fn flag(&self, name: &str) -> bool;
}

/// Reads flags from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl ProcessEnv for SystemEnv {
    fn flag(&self, name: &str) -> bool {
        match std::env::var(name) {
            Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => false,
        }
    }
}
