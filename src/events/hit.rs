//! Contact input messages and hit output events.
//!
//! [`ContactMessage`] is the boundary with the host's physics layer: one
//! message per overlap notification, carrying the detector entity, the
//! other object's identity/tag/layer and contact geometry when the
//! physics layer provides it (zero vectors for trigger overlaps).
//!
//! The [`hitdetect`](crate::systems::hitdetect) system filters and
//! dedupes these through each entity's
//! [`HitDetector`](crate::components::hitdetector::HitDetector) and
//! triggers a [`HitEvent`] per accepted hit.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::hitdetector::{DetectionKind, HitTiming};

/// One overlap notification from the physics layer.
#[derive(Message, Debug, Clone)]
pub struct ContactMessage {
    /// Entity whose [`HitDetector`](crate::components::hitdetector::HitDetector)
    /// should process this contact.
    pub detector: Entity,
    /// The overlapping object.
    pub other: Entity,
    /// The other object's tag, as assigned by the host.
    pub other_tag: String,
    /// The other object's layer index (bit position, not mask).
    pub other_layer: u32,
    pub detection: DetectionKind,
    pub timing: HitTiming,
    /// Zero for trigger overlaps.
    pub contact_point: Vec2,
    /// Zero for trigger overlaps.
    pub contact_normal: Vec2,
    /// Zero for trigger overlaps.
    pub relative_velocity: Vec2,
}

impl ContactMessage {
    /// A trigger-style contact with no geometry.
    pub fn trigger(
        detector: Entity,
        other: Entity,
        other_tag: impl Into<String>,
        other_layer: u32,
        timing: HitTiming,
    ) -> Self {
        ContactMessage {
            detector,
            other,
            other_tag: other_tag.into(),
            other_layer,
            detection: DetectionKind::Trigger,
            timing,
            contact_point: Vec2::ZERO,
            contact_normal: Vec2::ZERO,
            relative_velocity: Vec2::ZERO,
        }
    }
}

/// Everything an observer needs about one accepted hit.
#[derive(Debug, Clone)]
pub struct HitInfo {
    pub other: Entity,
    pub other_tag: String,
    pub detection: DetectionKind,
    pub timing: HitTiming,
    pub contact_point: Vec2,
    pub contact_normal: Vec2,
    pub relative_velocity: Vec2,
}

/// Triggered once per accepted hit, after the detector's own observer
/// callbacks have run.
#[derive(Event, Debug, Clone)]
pub struct HitEvent {
    /// Entity owning the detector that accepted the hit.
    pub detector: Entity,
    pub info: HitInfo,
}
