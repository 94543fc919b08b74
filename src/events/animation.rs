//! Animation playback events.
//!
//! The [`animation`](crate::systems::animation) system triggers
//! [`AnimationStarted`] when an animator accepted a play request since the
//! last tick and [`AnimationCompleted`] when a one-shot clip reaches its
//! end. Observers can subscribe to chain follow-up animations, release
//! state locks, despawn corpses after a death clip, and so on.
//!
//! # Example
//!
//! ```ignore
//! commands.add_observer(|trigger: On<AnimationCompleted>, mut commands: Commands| {
//!     if trigger.event().name == "Hero_Die" {
//!         commands.entity(trigger.event().entity).despawn();
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

/// Triggered when an animator starts playing a clip.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AnimationStarted {
    pub entity: Entity,
    /// Full clip name, e.g. `"Hero_Run"`.
    pub name: String,
}

/// Triggered when a non-looping clip finishes. The animator keeps the
/// clip loaded and frozen on its last frame.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AnimationCompleted {
    pub entity: Entity,
    pub name: String,
}
