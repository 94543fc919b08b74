//! ECS systems driving animation and hit detection.
//!
//! Submodules overview
//! - [`animation`] – advance animators, sync sprites, trigger playback events
//! - [`hitdetect`] – route physics contacts through hit detectors
//! - [`time`] – update simulation time, delta and tick counter

pub mod animation;
pub mod hitdetect;
pub mod time;
