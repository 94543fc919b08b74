//! Animation advancement system.
//!
//! Once per tick, every [`Animator2D`](crate::components::animator::Animator2D)
//! is advanced by the scaled delta from
//! [`WorldTime`](crate::resources::worldtime::WorldTime), the active
//! frame's texture key is written into the entity's
//! [`Sprite`](crate::components::sprite::Sprite), and playback
//! notifications are triggered as ECS events.
//!
//! # Animation Flow
//!
//! 1. Clips are registered on an entity's animator (directly, from JSON,
//!    or dynamically by playing ad-hoc clip data)
//! 2. Gameplay code calls `play`/`force_play`/`stop` on the animator
//! 3. This system drives per-tick advancement: time accumulation, frame
//!    resolution, frame-event dispatch, loop/complete transitions
//! 4. The renderer reads the synced [`Sprite`] to draw the frame

use bevy_ecs::prelude::*;

use crate::components::animator::Animator2D;
use crate::components::sprite::Sprite;
use crate::events::animation::{AnimationCompleted, AnimationStarted};
use crate::resources::worldtime::WorldTime;

/// Advance animation playback and sync sprite frames.
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta.
/// - Mutates [`Animator2D`] playback state and dispatches its frame-event
///   callbacks.
/// - Updates [`Sprite`] with the current frame's image key.
/// - Triggers [`AnimationStarted`] for play requests accepted since the
///   last tick and [`AnimationCompleted`] when a one-shot clip ends.
pub fn animation(
    mut query: Query<(Entity, &mut Animator2D, Option<&mut Sprite>)>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut animator, mut sprite) in query.iter_mut() {
        if animator.take_just_started() && !animator.current_animation_name().is_empty() {
            commands.trigger(AnimationStarted {
                entity,
                name: animator.current_animation_name().to_string(),
            });
        }

        let outcome = animator.advance(time.delta);
        if outcome.completed {
            commands.trigger(AnimationCompleted {
                entity,
                name: animator.current_animation_name().to_string(),
            });
        }

        if let Some(sprite) = sprite.as_mut() {
            if let Some(frame) = animator.current_frame() {
                if sprite.image != frame.image {
                    sprite.image = frame.image.clone();
                }
            }
        }
    }
}
