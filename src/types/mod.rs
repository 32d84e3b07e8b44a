//! Core input types for the command-line front end.
//!
//! These make invalid ports and malformed targets unrepresentable before
//! anything reaches the scan engine.

mod port;
mod target;

pub use port::{Port, PortError, PortRange, PortSpec};
pub use target::{parse_target_list, TargetError, TargetSpec};
