//! ECS resources made available to systems.
//!
//! - [`worldtime`] – simulation time, delta and tick counter

pub mod worldtime;
