//! ECS components for animated and hit-detecting entities.
//!
//! Submodules overview:
//! - [`animation`] – animation clip data and the name-keyed registry
//! - [`animator`] – per-entity playback engine with priority gating and frame events
//! - [`hitdetector`] – contact filtering, per-tick dedupe and hit observers
//! - [`sprite`] – render-target component carrying the active frame's texture key

pub mod animation;
pub mod animator;
pub mod hitdetector;
pub mod sprite;
