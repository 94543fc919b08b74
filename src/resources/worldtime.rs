//! Simulation clock resource.
//!
//! One instance per world, updated once per tick by
//! [`update_world_time`](crate::systems::time::update_world_time).
//! `frame_count` doubles as the hit-dedupe tick counter, `elapsed` as the
//! stay-interval throttle clock.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy)]
pub struct WorldTime {
    /// Scaled seconds since startup.
    pub elapsed: f32,
    /// Scaled seconds of the current tick.
    pub delta: f32,
    /// Multiplier applied to incoming deltas (slow motion, fast forward).
    pub time_scale: f32,
    /// Number of completed simulation ticks.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}
