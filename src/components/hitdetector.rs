//! Hit detection component.
//!
//! A [`HitDetector`] filters the contact notifications supplied by the
//! host's physics layer down to the hits the gameplay code cares about:
//! tag and layer gates, a per-tick dedupe set so one overlapping object
//! produces at most one hit per simulation step, and an optional interval
//! throttle for `Stay` contacts. Accepted hits are forwarded to the
//! detector's observer callbacks and, by the
//! [`hitdetect`](crate::systems::hitdetect) system, to a
//! [`HitEvent`](crate::events::hit::HitEvent).

use bevy_ecs::prelude::{Component, Entity};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::events::hit::HitInfo;

/// Layer bitmask value accepting every layer.
pub const ALL_LAYERS: u32 = u32::MAX;

/// Whether contacts come from trigger (overlap-only) or solid-collision
/// shapes in the physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionKind {
    Trigger,
    Collision,
}

/// Which phase of an overlap the detector reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTiming {
    Enter,
    Stay,
    Exit,
}

/// Named-field configuration for a [`HitDetector`].
#[derive(Debug, Clone)]
pub struct HitDetectorConfig {
    pub detection: DetectionKind,
    pub timing: HitTiming,
    /// Accepted tags; empty means every tag.
    pub target_tags: Vec<String>,
    /// Accepted layer bitmask; [`ALL_LAYERS`] means every layer.
    pub target_layers: u32,
    /// Minimum seconds between repeat hits of the same object under
    /// `Stay` timing. Zero disables the throttle.
    pub hit_interval: f32,
}

impl Default for HitDetectorConfig {
    fn default() -> Self {
        HitDetectorConfig {
            detection: DetectionKind::Trigger,
            timing: HitTiming::Enter,
            target_tags: Vec::new(),
            target_layers: ALL_LAYERS,
            hit_interval: 0.0,
        }
    }
}

type HitObserver = Box<dyn FnMut(&HitInfo) + Send + Sync>;

/// Filters and dedupes contact notifications for one entity.
#[derive(Component)]
pub struct HitDetector {
    pub config: HitDetectorConfig,

    last_tick: Option<u64>,
    hit_this_tick: FxHashSet<Entity>,
    last_hit_times: FxHashMap<Entity, f32>,

    observers: Vec<HitObserver>,
}

impl Default for HitDetector {
    fn default() -> Self {
        HitDetector::new(HitDetectorConfig::default())
    }
}

impl HitDetector {
    pub fn new(config: HitDetectorConfig) -> Self {
        HitDetector {
            config,
            last_tick: None,
            hit_this_tick: FxHashSet::default(),
            last_hit_times: FxHashMap::default(),
            observers: Vec::new(),
        }
    }

    /// Observe accepted hits. Observers run in registration order.
    pub fn on_hit(&mut self, observer: impl FnMut(&HitInfo) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Does a contact of this kind and phase concern this detector at all?
    pub fn accepts_contact(&self, detection: DetectionKind, timing: HitTiming) -> bool {
        self.config.detection == detection && self.config.timing == timing
    }

    /// Tag and layer gates, from the contact's metadata.
    pub fn filter(&self, tag: &str, layer: u32) -> bool {
        if self.config.target_layers != ALL_LAYERS {
            let bit = 1u32.checked_shl(layer).unwrap_or(0);
            if self.config.target_layers & bit == 0 {
                return false;
            }
        }

        if !self.config.target_tags.is_empty()
            && !self.config.target_tags.iter().any(|t| t == tag)
        {
            return false;
        }

        true
    }

    /// Dedupe and throttle an already-filtered contact. `tick` is the
    /// simulation frame counter, `now` the simulation clock in seconds.
    /// Returns whether the hit should be delivered.
    pub fn should_notify(&mut self, other: Entity, tick: u64, now: f32) -> bool {
        if self.last_tick != Some(tick) {
            self.hit_this_tick.clear();
            self.last_tick = Some(tick);
        }

        if self.hit_this_tick.contains(&other) {
            return false;
        }

        if self.config.timing == HitTiming::Stay && self.config.hit_interval > 0.0 {
            if let Some(last) = self.last_hit_times.get(&other) {
                if now - last < self.config.hit_interval {
                    return false;
                }
            }
        }
        self.last_hit_times.insert(other, now);

        self.hit_this_tick.insert(other);
        true
    }

    /// Invoke every observer with an accepted hit.
    pub fn notify(&mut self, info: &HitInfo) {
        for observer in self.observers.iter_mut() {
            observer(info);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::World;

    use super::*;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    fn stay_detector(interval: f32) -> HitDetector {
        HitDetector::new(HitDetectorConfig {
            timing: HitTiming::Stay,
            hit_interval: interval,
            ..Default::default()
        })
    }

    // --- Filtering ---

    #[test]
    fn test_filter_defaults_accept_everything() {
        let det = HitDetector::default();
        assert!(det.filter("anything", 0));
        assert!(det.filter("", 31));
    }

    #[test]
    fn test_filter_layer_mask() {
        let det = HitDetector::new(HitDetectorConfig {
            target_layers: (1 << 3) | (1 << 5),
            ..Default::default()
        });
        assert!(det.filter("x", 3));
        assert!(det.filter("x", 5));
        assert!(!det.filter("x", 4));
        // out-of-range layers never match a finite mask
        assert!(!det.filter("x", 40));
    }

    #[test]
    fn test_filter_tags() {
        let det = HitDetector::new(HitDetectorConfig {
            target_tags: vec!["enemy".into(), "breakable".into()],
            ..Default::default()
        });
        assert!(det.filter("enemy", 0));
        assert!(det.filter("breakable", 0));
        assert!(!det.filter("player", 0));
    }

    #[test]
    fn test_accepts_contact() {
        let det = HitDetector::new(HitDetectorConfig {
            detection: DetectionKind::Collision,
            timing: HitTiming::Enter,
            ..Default::default()
        });
        assert!(det.accepts_contact(DetectionKind::Collision, HitTiming::Enter));
        assert!(!det.accepts_contact(DetectionKind::Trigger, HitTiming::Enter));
        assert!(!det.accepts_contact(DetectionKind::Collision, HitTiming::Stay));
    }

    // --- Dedupe ---

    #[test]
    fn test_same_tick_dedupes_same_object() {
        let e = entities(1);
        let mut det = HitDetector::default();
        assert!(det.should_notify(e[0], 1, 0.0));
        assert!(!det.should_notify(e[0], 1, 0.0));
    }

    #[test]
    fn test_same_tick_allows_distinct_objects() {
        let e = entities(2);
        let mut det = HitDetector::default();
        assert!(det.should_notify(e[0], 1, 0.0));
        assert!(det.should_notify(e[1], 1, 0.0));
    }

    #[test]
    fn test_tick_advance_resets_dedupe() {
        let e = entities(1);
        let mut det = stay_detector(0.0);
        assert!(det.should_notify(e[0], 1, 0.0));
        assert!(det.should_notify(e[0], 2, 0.016));
    }

    // --- Stay interval throttle ---

    #[test]
    fn test_stay_interval_throttles_repeats() {
        let e = entities(1);
        let mut det = stay_detector(1.0);
        assert!(det.should_notify(e[0], 1, 0.0));
        // 0.5 s later: inside the interval, rejected
        assert!(!det.should_notify(e[0], 2, 0.5));
        // 1.0 s after the first accepted hit
        assert!(det.should_notify(e[0], 3, 1.0));
    }

    #[test]
    fn test_stay_interval_tracks_per_object() {
        let e = entities(2);
        let mut det = stay_detector(1.0);
        assert!(det.should_notify(e[0], 1, 0.0));
        // a different object is not throttled by the first one's clock
        assert!(det.should_notify(e[1], 2, 0.5));
        assert!(!det.should_notify(e[0], 2, 0.5));
    }

    #[test]
    fn test_enter_timing_ignores_interval() {
        let e = entities(1);
        let mut det = HitDetector::new(HitDetectorConfig {
            timing: HitTiming::Enter,
            hit_interval: 1.0,
            ..Default::default()
        });
        assert!(det.should_notify(e[0], 1, 0.0));
        assert!(det.should_notify(e[0], 2, 0.1));
    }
}
