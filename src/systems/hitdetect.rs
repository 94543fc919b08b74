//! Hit routing system.
//!
//! Drains the [`ContactMessage`](crate::events::hit::ContactMessage)
//! queue fed by the host's physics layer and routes each contact through
//! the target entity's [`HitDetector`](crate::components::hitdetector::HitDetector):
//! kind/timing match, tag/layer filter, per-tick dedupe and stay-interval
//! throttle. Surviving contacts invoke the detector's observer callbacks
//! and trigger a [`HitEvent`](crate::events::hit::HitEvent).

use bevy_ecs::prelude::*;

use crate::components::hitdetector::HitDetector;
use crate::events::hit::{ContactMessage, HitEvent, HitInfo};
use crate::resources::worldtime::WorldTime;

/// Filter, dedupe and forward physics contacts as hits.
///
/// Contacts addressed to entities without a [`HitDetector`] are dropped
/// silently; a detached physics layer may outlive a despawned entity by a
/// tick.
pub fn hit_detection(
    mut contacts: MessageReader<ContactMessage>,
    mut query: Query<&mut HitDetector>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for contact in contacts.read() {
        let Ok(mut detector) = query.get_mut(contact.detector) else {
            continue;
        };

        if !detector.accepts_contact(contact.detection, contact.timing) {
            continue;
        }
        if !detector.filter(&contact.other_tag, contact.other_layer) {
            continue;
        }
        if !detector.should_notify(contact.other, time.frame_count, time.elapsed) {
            continue;
        }

        let info = HitInfo {
            other: contact.other,
            other_tag: contact.other_tag.clone(),
            detection: contact.detection,
            timing: contact.timing,
            contact_point: contact.contact_point,
            contact_normal: contact.contact_normal,
            relative_velocity: contact.relative_velocity,
        };
        detector.notify(&info);
        commands.trigger(HitEvent {
            detector: contact.detector,
            info,
        });
    }
}
