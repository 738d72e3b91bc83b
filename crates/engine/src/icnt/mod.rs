//! Driver-facing interconnect.
//!
//! A driver builds `InterconnectCommand`s, hands them to an
//! `InterconnectWrapper`, calls `cycle_step` once per cycle and polls the
//! command's `is_received` / `is_handled` flags.

/// Command handles and their completion flags.
pub mod command;

/// Command state machine over the traffic manager interface.
pub mod wrapper;

pub use command::{CommandSpec, InterconnectCommand};
pub use wrapper::InterconnectWrapper;
