//! 2D sprite rendering component.
//!
//! The renderer boundary: the animation system writes the active frame's
//! texture key here once per tick, and whatever renderer the host uses
//! reads it back. Flip flags are carried for the renderer's benefit and
//! never touched by this library.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    /// Texture key resolved by the host renderer.
    pub image: String,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Sprite {
    pub fn new(image: impl Into<String>) -> Self {
        Sprite {
            image: image.into(),
            flip_h: false,
            flip_v: false,
        }
    }
}
