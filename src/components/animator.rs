//! Sprite animation playback component.
//!
//! An [`Animator2D`] owns everything one animated entity needs: its clip
//! registry, its frame-event bindings, the playback state machine and the
//! started/completed observer lists. The [`animation`](crate::systems::animation)
//! system drives [`Animator2D::advance`] once per tick with the scaled
//! delta from [`WorldTime`](crate::resources::worldtime::WorldTime) and
//! syncs the active frame into the entity's
//! [`Sprite`](crate::components::sprite::Sprite).
//!
//! # Playback rules
//!
//! - A play request resolves by exact name first, then by motion-name
//!   fallback (`"Run"` finds `"Hero_Run"`).
//! - Playing an ad-hoc clip registers it, so it becomes addressable by
//!   name afterwards.
//! - A request with a lower priority than the current clip is rejected;
//!   [`Animator2D::force_play`] skips the gate.
//! - Requesting the clip that is already actively playing is a no-op that
//!   reports success.
//! - Looping clips wrap at their total duration; one-shot clips fire the
//!   completed observers once, stop advancing and keep the last frame
//!   loaded so it stays on screen. `stop()` is the transition that clears
//!   the current clip.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::warn;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::animation::{AnimationData, AnimationRegistry, Frame, clips_from_json};
use crate::error::AnimatorError;

/// Sentinel for "no frame dispatched yet" in [`Animator2D::previous_frame_index`].
const NO_FRAME: i32 = -1;

type FrameAction = Box<dyn FnMut() + Send + Sync>;
type ClipObserver = Box<dyn FnMut(&AnimationData) + Send + Sync>;

/// A callback bound to a frame index of one named clip.
pub struct FrameEvent {
    pub frame_index: usize,
    action: FrameAction,
}

/// What happened during one [`Animator2D::advance`] call. The driving
/// system uses this to sync the sprite and trigger ECS events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// The frame index changed this tick (frame events were dispatched).
    pub frame_changed: bool,
    /// A one-shot clip reached its end this tick.
    pub completed: bool,
}

/// Playback engine for 2D sprite-frame animations.
#[derive(Component)]
pub struct Animator2D {
    registry: AnimationRegistry,
    frame_events: FxHashMap<String, SmallVec<[FrameEvent; 4]>>,

    current: Option<Arc<AnimationData>>,
    running: bool,
    paused: bool,
    elapsed: f32,
    current_frame: usize,
    previous_frame: i32,
    just_started: bool,

    started_observers: Vec<ClipObserver>,
    completed_observers: Vec<ClipObserver>,
}

impl Default for Animator2D {
    fn default() -> Self {
        Animator2D::new()
    }
}

impl Animator2D {
    pub fn new() -> Self {
        Animator2D {
            registry: AnimationRegistry::new(),
            frame_events: FxHashMap::default(),
            current: None,
            running: false,
            paused: false,
            elapsed: 0.0,
            current_frame: 0,
            previous_frame: NO_FRAME,
            just_started: false,
            started_observers: Vec::new(),
            completed_observers: Vec::new(),
        }
    }

    // --- Registration ---

    /// Register a clip in this animator's registry.
    pub fn register_animation(&mut self, data: AnimationData) -> Result<(), AnimatorError> {
        self.registry.register(data)?;
        Ok(())
    }

    /// Register every clip from a JSON array of clip definitions.
    /// The batch is validated up front; on error nothing is registered.
    /// Returns the number of clips registered.
    pub fn register_clips_json(&mut self, json: &str) -> Result<usize, AnimatorError> {
        let clips = clips_from_json(json)?;
        if let Some(bad) = clips.iter().find(|c| !c.is_valid()) {
            return Err(AnimatorError::InvalidAnimation(bad.name.clone()));
        }
        let count = clips.len();
        for clip in clips {
            self.registry.register(clip)?;
        }
        Ok(count)
    }

    /// Remove a clip and drop any frame events bound to it. No-op if absent.
    pub fn unregister_animation(&mut self, name: &str) {
        self.registry.unregister(name);
        self.clear_frame_events(name);
    }

    pub fn registry(&self) -> &AnimationRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AnimationRegistry {
        &mut self.registry
    }

    // --- Playback control ---

    /// Play a registered clip by name (or by motion name as a fallback),
    /// honoring the priority gate. Returns false when the name resolves to
    /// nothing or the request loses to the current clip's priority.
    pub fn play(&mut self, name: &str) -> bool {
        self.play_resolved(name, true)
    }

    /// Play by name, ignoring priority.
    pub fn force_play(&mut self, name: &str) -> bool {
        self.play_resolved(name, false)
    }

    /// Play an ad-hoc clip, registering it in the process.
    pub fn play_data(&mut self, data: AnimationData) -> bool {
        self.play_clip(data, true)
    }

    /// Play an ad-hoc clip, ignoring priority.
    pub fn force_play_data(&mut self, data: AnimationData) -> bool {
        self.play_clip(data, false)
    }

    /// Resolve a name to a registered clip, by exact name first and by
    /// motion name as a fallback.
    pub fn resolve(&self, name: &str) -> Result<&Arc<AnimationData>, AnimatorError> {
        self.registry
            .get(name)
            .or_else(|| self.registry.find_by_motion(name))
            .ok_or_else(|| AnimatorError::NotFound(name.to_string()))
    }

    fn play_resolved(&mut self, name: &str, check_priority: bool) -> bool {
        if name.is_empty() {
            warn!("play request with empty animation name");
            return false;
        }

        let clip = match self.resolve(name) {
            Ok(clip) => Arc::clone(clip),
            Err(e) => {
                warn!("{e}");
                return false;
            }
        };

        self.start_clip(clip, check_priority)
    }

    fn play_clip(&mut self, data: AnimationData, check_priority: bool) -> bool {
        // Dynamic registration happens before the priority gate, so even a
        // rejected clip becomes discoverable by name.
        let clip = match self.registry.register(data) {
            Ok(clip) => clip,
            Err(e) => {
                warn!("cannot play animation: {e}");
                return false;
            }
        };

        self.start_clip(clip, check_priority)
    }

    fn start_clip(&mut self, clip: Arc<AnimationData>, check_priority: bool) -> bool {
        if let Some(current) = &self.current {
            if check_priority && clip.priority < current.priority {
                // Normal outcome, not an error: lower priority never
                // interrupts.
                return false;
            }
            if Arc::ptr_eq(current, &clip) && self.is_playing() {
                return true;
            }
        }

        self.stop();
        self.current = Some(Arc::clone(&clip));
        self.running = true;
        self.just_started = true;

        for observer in self.started_observers.iter_mut() {
            observer(&clip);
        }
        true
    }

    /// Freeze time accumulation. The playback state is kept.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Pause only if `name` is the clip currently loaded. Returns whether
    /// anything was paused.
    pub fn try_pause(&mut self, name: &str) -> bool {
        if self.current.is_some() && self.current_animation_name() == name {
            self.pause();
            true
        } else {
            false
        }
    }

    /// Cancel playback and reset all state, clearing the current clip.
    /// Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
        self.elapsed = 0.0;
        self.current_frame = 0;
        self.previous_frame = NO_FRAME;
        self.current = None;
    }

    // --- Seeking ---

    /// Jump to a time within the current clip. The frame index is
    /// recomputed; frame events are not dispatched for seeks.
    pub fn set_time(&mut self, time: f32) -> Result<(), AnimatorError> {
        let clip = self.current.as_ref().ok_or(AnimatorError::NoActiveAnimation)?;
        self.elapsed = time.clamp(0.0, clip.total_duration());
        self.current_frame = clip.frame_index_at(self.elapsed);
        self.previous_frame = self.current_frame as i32;
        Ok(())
    }

    /// Jump to a normalized progress in `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) -> Result<(), AnimatorError> {
        let clip = self.current.as_ref().ok_or(AnimatorError::NoActiveAnimation)?;
        let time = progress.clamp(0.0, 1.0) * clip.total_duration();
        self.set_time(time)
    }

    /// Jump to the start of a frame index (clamped to the valid range).
    pub fn set_frame(&mut self, frame_index: usize) -> Result<(), AnimatorError> {
        let clip = self.current.as_ref().ok_or(AnimatorError::NoActiveAnimation)?;
        let time = clip.time_at_frame(frame_index);
        self.set_time(time)
    }

    // --- Frame events ---

    /// Bind a callback to a frame index of a named clip. Multiple bindings
    /// may share an index; they fire in registration order, once each time
    /// playback enters that frame.
    pub fn add_frame_event(
        &mut self,
        animation_name: impl Into<String>,
        frame_index: usize,
        action: impl FnMut() + Send + Sync + 'static,
    ) {
        self.frame_events
            .entry(animation_name.into())
            .or_default()
            .push(FrameEvent {
                frame_index,
                action: Box::new(action),
            });
    }

    /// Drop every frame event bound to a clip name.
    pub fn clear_frame_events(&mut self, animation_name: &str) {
        self.frame_events.remove(animation_name);
    }

    fn dispatch_frame_events(&mut self, animation_name: &str, frame_index: usize) {
        if let Some(events) = self.frame_events.get_mut(animation_name) {
            for event in events.iter_mut() {
                if event.frame_index == frame_index {
                    (event.action)();
                }
            }
        }
    }

    // --- Observers ---

    /// Observe successful play requests. Observers run in registration
    /// order, synchronously from the play call.
    pub fn on_started(&mut self, observer: impl FnMut(&AnimationData) + Send + Sync + 'static) {
        self.started_observers.push(Box::new(observer));
    }

    /// Observe one-shot clips reaching their end. Observers run in
    /// registration order, synchronously from the advancing tick.
    pub fn on_completed(&mut self, observer: impl FnMut(&AnimationData) + Send + Sync + 'static) {
        self.completed_observers.push(Box::new(observer));
    }

    // --- Advancement ---

    /// Advance playback by `dt` seconds (already time-scaled). Within one
    /// tick the order is fixed: accumulate time, resolve the frame index,
    /// dispatch frame events if a new frame was entered, then handle the
    /// loop or completion transition.
    pub fn advance(&mut self, dt: f32) -> Advance {
        let mut outcome = Advance::default();
        if !self.running || self.paused {
            return outcome;
        }
        let Some(clip) = self.current.clone() else {
            return outcome;
        };

        self.elapsed += dt * clip.speed;
        self.current_frame = clip.frame_index_at(self.elapsed);

        if self.current_frame as i32 != self.previous_frame {
            outcome.frame_changed = true;
            self.dispatch_frame_events(&clip.name, self.current_frame);
            self.previous_frame = self.current_frame as i32;
        }

        if self.elapsed >= clip.total_duration() {
            if clip.looped {
                self.elapsed = 0.0;
                self.current_frame = 0;
                self.previous_frame = NO_FRAME;
            } else {
                self.running = false;
                outcome.completed = true;
                for observer in self.completed_observers.iter_mut() {
                    observer(&clip);
                }
            }
        }

        outcome
    }

    /// Consume the "a play request just succeeded" flag. Used by the
    /// animation system to trigger the started ECS event once.
    pub fn take_just_started(&mut self) -> bool {
        std::mem::take(&mut self.just_started)
    }

    // --- State accessors ---

    pub fn current_animation_name(&self) -> &str {
        self.current.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn current_animation(&self) -> Option<&Arc<AnimationData>> {
        self.current.as_ref()
    }

    /// Actively advancing: an advancement task exists and is not paused.
    pub fn is_playing(&self) -> bool {
        self.running && !self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// A one-shot clip ran to its end and is frozen on its last frame.
    pub fn is_completed(&self) -> bool {
        !self.running && self.current.is_some()
    }

    pub fn current_time(&self) -> f32 {
        self.elapsed
    }

    pub fn current_frame_index(&self) -> usize {
        self.current_frame
    }

    /// Index of the last frame events were dispatched for, or -1.
    pub fn previous_frame_index(&self) -> i32 {
        self.previous_frame
    }

    pub fn current_animation_length(&self) -> f32 {
        self.current.as_ref().map(|c| c.total_duration()).unwrap_or(0.0)
    }

    pub fn current_animation_frame_count(&self) -> usize {
        self.current.as_ref().map(|c| c.frame_count()).unwrap_or(0)
    }

    /// Normalized playback position in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let length = self.current_animation_length();
        if length > 0.0 { self.elapsed / length } else { 0.0 }
    }

    pub fn current_speed(&self) -> f32 {
        self.current.as_ref().map(|c| c.speed).unwrap_or(1.0)
    }

    pub fn current_loop(&self) -> bool {
        self.current.as_ref().map(|c| c.looped).unwrap_or(false)
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.as_ref().and_then(|c| c.frames.get(self.current_frame))
    }
}
