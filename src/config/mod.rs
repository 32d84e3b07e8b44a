//! Configuration management for portsweep.
//!
//! Provides XDG-compliant settings that supply defaults for the command line.

mod settings;

pub use settings::{AppSettings, Paths};
