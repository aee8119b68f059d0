use glam::{Quat, Vec3};
use throng_core::{ClipId, Result, TICKS_PER_SECOND, ThrongError};

use crate::pose::BoneTransform;
use crate::tracks::KeyframeTrack;

/// Keyframe tracks of one bone within a clip.
///
/// Each bone carries its own tick length, but every bone of an instance
/// shares the instance's clock. Missing tracks sample to the bind identity.
#[derive(Debug, Clone)]
pub struct BoneAnimation {
    tick_length: u32,
    position: Option<KeyframeTrack<Vec3>>,
    rotation: Option<KeyframeTrack<Quat>>,
    scale: Option<KeyframeTrack<Vec3>>,
}

impl BoneAnimation {
    #[must_use]
    pub fn new(tick_length: u32) -> Self {
        Self {
            tick_length,
            position: None,
            rotation: None,
            scale: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.position = Some(track);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, track: KeyframeTrack<Quat>) -> Self {
        self.rotation = Some(track);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.scale = Some(track);
        self
    }

    #[inline]
    #[must_use]
    pub fn tick_length(&self) -> u32 {
        self.tick_length
    }

    #[must_use]
    pub fn interp_position(&self, t: f32) -> Vec3 {
        self.position.as_ref().map_or(Vec3::ZERO, |track| track.sample(t))
    }

    #[must_use]
    pub fn interp_rotation(&self, t: f32) -> Quat {
        self.rotation.as_ref().map_or(Quat::IDENTITY, |track| track.sample(t))
    }

    #[must_use]
    pub fn interp_scale(&self, t: f32) -> Vec3 {
        self.scale.as_ref().map_or(Vec3::ONE, |track| track.sample(t))
    }

    /// Local transform at normalized time `t`.
    #[must_use]
    pub fn sample(&self, t: f32) -> BoneTransform {
        BoneTransform::new(self.interp_position(t), self.interp_rotation(t), self.interp_scale(t))
    }
}

/// Immutable animation asset shared by every instance that plays it.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    id: ClipId,
    name: String,
    tick_length: u32,
    bones: Vec<BoneAnimation>,
    loop_by_default: bool,
}

impl AnimationClip {
    /// Builds a clip whose tick length is the longest bone track.
    pub fn new(name: impl Into<String>, bones: Vec<BoneAnimation>) -> Result<Self> {
        let name = name.into();

        if bones.iter().any(|b| b.tick_length == 0) {
            return Err(ThrongError::DegenerateClip(name));
        }
        let tick_length = bones.iter().map(BoneAnimation::tick_length).max().unwrap_or(0);
        if tick_length == 0 {
            return Err(ThrongError::DegenerateClip(name));
        }

        Ok(Self {
            id: ClipId::NONE,
            name,
            tick_length,
            bones,
            loop_by_default: true,
        })
    }

    #[must_use]
    pub fn with_loop(mut self, looping: bool) -> Self {
        self.loop_by_default = looping;
        self
    }

    /// GPU animation id; [`ClipId::NONE`] until registered.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ClipId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: ClipId) {
        self.id = id;
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn tick_length(&self) -> u32 {
        self.tick_length
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.tick_length as f32 / TICKS_PER_SECOND as f32
    }

    #[inline]
    #[must_use]
    pub fn loops_by_default(&self) -> bool {
        self.loop_by_default
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&BoneAnimation> {
        self.bones.get(index)
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[BoneAnimation] {
        &self.bones
    }
}
