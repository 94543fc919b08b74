//! Animation clip data and the per-animator registry.
//!
//! An [`AnimationData`] is a named, ordered list of [`Frame`]s (texture key
//! plus duration in seconds) with playback parameters: priority, speed
//! multiplier and looping. Clip names encode a hierarchy: splitting on the
//! first matching separator (`_`, `-`, `.`) yields a character name (first
//! segment) and a motion name (last segment), so `"Hero_Run"` can be
//! addressed by the motion `"Run"` alone.
//!
//! The [`AnimationRegistry`] keys clips by full name and keeps an
//! insertion-ordered mirror used for motion lookups and enumeration.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::AnimatorError;

/// Separators tried in order when deriving name parts.
const SEPARATORS: [char; 3] = ['_', '-', '.'];

/// Shortest frame duration produced by clip import, to avoid degenerate
/// zero or negative durations from coincident keyframes.
pub const MIN_FRAME_DURATION: f32 = 1.0 / 60.0;

fn default_speed() -> f32 {
    1.0
}

fn default_looped() -> bool {
    true
}

/// One frame of a sprite animation: a texture key and how long it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Texture key resolved by the host renderer.
    pub image: String,
    /// Display time in seconds.
    pub duration: f32,
}

impl Frame {
    pub fn new(image: impl Into<String>, duration: f32) -> Self {
        Frame {
            image: image.into(),
            duration,
        }
    }
}

/// A named animation clip: ordered frames plus playback parameters.
///
/// `Clone` produces a deep copy of the frame list; clips held by a
/// registry are shared behind `Arc` and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    pub name: String,
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_looped")]
    pub looped: bool,
}

impl AnimationData {
    pub fn new(name: impl Into<String>, frames: Vec<Frame>) -> Self {
        AnimationData {
            name: name.into(),
            frames,
            priority: 0,
            speed: 1.0,
            looped: true,
        }
    }

    /// Build a clip from `(time, image)` keyframes, as extracted from an
    /// externally authored clip. Keyframes are sorted by time; each frame
    /// lasts until the next keyframe, the last one lasts `1 / frame_rate`,
    /// and every duration is floored at [`MIN_FRAME_DURATION`].
    pub fn from_keyframes(
        name: impl Into<String>,
        mut keyframes: Vec<(f32, String)>,
        frame_rate: f32,
    ) -> Self {
        keyframes.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut frames = Vec::with_capacity(keyframes.len());
        for i in 0..keyframes.len() {
            let duration = if i + 1 < keyframes.len() {
                keyframes[i + 1].0 - keyframes[i].0
            } else {
                1.0 / frame_rate
            };
            frames.push(Frame::new(
                keyframes[i].1.clone(),
                duration.max(MIN_FRAME_DURATION),
            ));
        }

        AnimationData::new(name, frames)
    }

    /// Sum of all frame durations in seconds.
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration).sum()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// A clip is playable when it has a name and at least one frame.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.frames.is_empty()
    }

    /// Name segments after splitting on the first matching separator.
    /// Empty segments are dropped; with no separator the whole name is the
    /// single part.
    pub fn name_parts(&self) -> Vec<&str> {
        for sep in SEPARATORS {
            if self.name.contains(sep) {
                return self.name.split(sep).filter(|s| !s.is_empty()).collect();
            }
        }
        vec![self.name.as_str()]
    }

    /// First name segment, e.g. `"Hero"` for `"Hero_Run"`.
    pub fn character_name(&self) -> &str {
        self.name_parts().first().copied().unwrap_or("")
    }

    /// Last name segment, e.g. `"Run"` for `"Hero_Run"`.
    pub fn motion_name(&self) -> &str {
        self.name_parts().last().copied().unwrap_or("")
    }

    /// Resolve the active frame index for an elapsed time by walking the
    /// frames in order and accumulating durations. Times past the end clamp
    /// to the last frame; the loop/complete transition is the caller's job.
    pub fn frame_index_at(&self, elapsed: f32) -> usize {
        let mut accumulated = 0.0;
        for (i, frame) in self.frames.iter().enumerate() {
            accumulated += frame.duration;
            if elapsed <= accumulated {
                return i;
            }
        }
        self.frames.len().saturating_sub(1)
    }

    /// Cumulative time at which the given frame starts. Indices past the
    /// end yield the start of the last frame.
    pub fn time_at_frame(&self, frame_index: usize) -> f32 {
        let end = frame_index.min(self.frames.len().saturating_sub(1));
        self.frames[..end].iter().map(|f| f.duration).sum()
    }
}

/// Parse a JSON array of clips, e.g. for bulk registration at startup.
pub fn clips_from_json(json: &str) -> Result<Vec<AnimationData>, AnimatorError> {
    let clips: Vec<AnimationData> = serde_json::from_str(json)?;
    Ok(clips)
}

/// Name-keyed store of animation clips.
///
/// Clips are shared behind `Arc` so the playback engine can hold the
/// currently playing clip without cloning frame data. Re-registration is
/// last-write-wins in the map; the insertion-ordered mirror keeps the slot
/// of the first registration, so motion lookups stay deterministic.
#[derive(Default)]
pub struct AnimationRegistry {
    by_name: FxHashMap<String, Arc<AnimationData>>,
    ordered: Vec<Arc<AnimationData>>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        AnimationRegistry::default()
    }

    /// Insert or overwrite a clip by name. Invalid clips are rejected.
    pub fn register(&mut self, data: AnimationData) -> Result<Arc<AnimationData>, AnimatorError> {
        if !data.is_valid() {
            return Err(AnimatorError::InvalidAnimation(data.name));
        }

        let clip = Arc::new(data);
        self.by_name.insert(clip.name.clone(), Arc::clone(&clip));

        match self.ordered.iter_mut().find(|c| c.name == clip.name) {
            Some(slot) => *slot = Arc::clone(&clip),
            None => self.ordered.push(Arc::clone(&clip)),
        }

        Ok(clip)
    }

    /// Remove a clip from the map and the ordered mirror. No-op if absent.
    pub fn unregister(&mut self, name: &str) {
        self.by_name.remove(name);
        self.ordered.retain(|c| c.name != name);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<AnimationData>> {
        self.by_name.get(name)
    }

    /// First-registered clip whose motion name matches. Fallback for play
    /// requests that address an animation by its suffix alone.
    pub fn find_by_motion(&self, motion_name: &str) -> Option<&Arc<AnimationData>> {
        self.ordered.iter().find(|c| c.motion_name() == motion_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Clips in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AnimationData>> {
        self.ordered.iter()
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn has_motion(&self, motion_name: &str) -> bool {
        self.ordered.iter().any(|c| c.motion_name() == motion_name)
    }

    pub fn has_character_motion(&self, character_name: &str, motion_name: &str) -> bool {
        self.ordered
            .iter()
            .any(|c| c.character_name() == character_name && c.motion_name() == motion_name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
