//! Core algorithms – frame scheduling, scroll integration, gates,
//! choreography, springs and scroll-linked triggers.
//!
//! Nothing in this module depends on any TUI or rendering crate, and nothing
//! here knows what a "page" is.  Every type is driven explicitly by the
//! caller (wheel deltas in, frames ticked), so all of it is testable without
//! a terminal.

pub mod choreo;
pub mod engine;
pub mod frame;
pub mod gate;
pub mod spring;
pub mod trigger;
pub mod wheel;
