//! Event types exchanged across systems.
//!
//! Submodules:
//! - [`animation`] – playback started/completed notifications
//! - [`hit`] – physics contact input messages and accepted hit events

pub mod animation;
pub mod hit;
