//! CPU bone evaluator.
//!
//! Mirrors the GPU compute evaluator: every bone samples its own track at
//! its own normalized time (all bones share the instance clock), then
//! composes `parent_world * local`. Root-level bones compose with the mesh
//! world transform.
//!
//! While blending, each bone's local transform is sampled from both
//! animations and blended component-wise (lerp translation/scale, slerp
//! rotation) *before* composition, so every child is composed with its
//! blended parent exactly like the GPU does per bone.
//!
//! Evaluation is iterative: a single bone walks its root-first chain, a
//! full pose walks the hierarchy's parent-first order into a flat array.

use glam::Affine3A;
use throng_core::{Result, ThrongError, Ticks};

use crate::clip::AnimationClip;
use crate::clock::PlaybackClock;
use crate::hierarchy::BoneHierarchy;
use crate::pose::BoneTransform;

/// One animation slot: a clip and the slot's clock offset.
#[derive(Debug, Clone, Copy)]
pub struct AnimationLayer<'a> {
    pub clip: &'a AnimationClip,
    pub offset_ticks: u32,
}

impl<'a> AnimationLayer<'a> {
    #[must_use]
    pub fn new(clip: &'a AnimationClip, offset_ticks: u32) -> Self {
        Self { clip, offset_ticks }
    }

    /// Local transform of `bone` at global tick `now`.
    pub fn sample_bone(
        &self,
        bone: usize,
        clock: &PlaybackClock,
        now: Ticks,
    ) -> Result<BoneTransform> {
        let track = self.clip.bone(bone).ok_or(ThrongError::InvalidBoneIndex {
            index: bone,
            bone_count: self.clip.bone_count(),
        })?;
        let t = clock.normalized_time(now, self.offset_ticks, track.tick_length())?;
        Ok(track.sample(t))
    }
}

/// What drives the local bone transforms of an instance.
#[derive(Debug, Clone, Copy)]
pub enum PoseSource<'a> {
    Single(AnimationLayer<'a>),
    Blend {
        a: AnimationLayer<'a>,
        b: AnimationLayer<'a>,
        /// Weight of `b`, clamped to `[0, 1]`.
        weight: f32,
    },
}

impl PoseSource<'_> {
    pub fn local_transform(
        &self,
        bone: usize,
        clock: &PlaybackClock,
        now: Ticks,
    ) -> Result<BoneTransform> {
        match self {
            Self::Single(layer) => layer.sample_bone(bone, clock, now),
            Self::Blend { a, b, weight } => {
                let weight = weight.clamp(0.0, 1.0);
                let local_a = a.sample_bone(bone, clock, now)?;
                if weight <= 0.0 {
                    return Ok(local_a);
                }
                let local_b = b.sample_bone(bone, clock, now)?;
                Ok(local_a.blend(&local_b, weight))
            }
        }
    }
}

/// Evaluates bone world transforms for one instance at one tick.
#[derive(Debug, Clone, Copy)]
pub struct BoneEvaluator<'a> {
    hierarchy: &'a BoneHierarchy,
    clock: PlaybackClock,
    now: Ticks,
}

impl<'a> BoneEvaluator<'a> {
    #[must_use]
    pub fn new(hierarchy: &'a BoneHierarchy, clock: PlaybackClock, now: Ticks) -> Self {
        Self { hierarchy, clock, now }
    }

    /// World transform of a single bone.
    pub fn bone_world(
        &self,
        mesh_world: Affine3A,
        bone: usize,
        source: &PoseSource<'_>,
    ) -> Result<Affine3A> {
        let chain = self.hierarchy.chain(bone)?;
        let mut world = mesh_world;
        for &b in &chain {
            let local = source.local_transform(b, &self.clock, self.now)?;
            world = world * local.to_affine();
        }
        Ok(world)
    }

    /// World transforms of every bone, indexed by bone.
    pub fn evaluate_pose(
        &self,
        mesh_world: Affine3A,
        source: &PoseSource<'_>,
        out: &mut Vec<Affine3A>,
    ) -> Result<()> {
        out.clear();
        out.resize(self.hierarchy.bone_count(), Affine3A::IDENTITY);

        for &bone in self.hierarchy.evaluation_order() {
            let local = source.local_transform(bone, &self.clock, self.now)?;
            let parent_world = match self.hierarchy.parent(bone) {
                Some(parent) => out[parent],
                None => mesh_world,
            };
            out[bone] = parent_world * local.to_affine();
        }
        Ok(())
    }
}
