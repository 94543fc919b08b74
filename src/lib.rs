//! anim2d library.
//!
//! A 2D sprite-frame animation playback engine with priority-gated
//! interruption and frame-indexed event callbacks, plus a hit-detection
//! event router. Built on bevy_ecs: animators and hit detectors are
//! components, advancement is driven by systems off a shared clock
//! resource, and notifications flow through events and messages.
//!
//! Rendering and physics simulation are external. The animation system
//! writes the active frame's texture key into a
//! [`Sprite`](components::sprite::Sprite) for a renderer to consume, and
//! the hit router consumes [`ContactMessage`](events::hit::ContactMessage)
//! values produced by whatever physics layer the host application uses.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
