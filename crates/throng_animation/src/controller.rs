//! Animation controllers (one skeleton + its clip family) and the global
//! clip registry that assigns GPU animation ids.
//!
//! Clips are immutable once registered and owned by the registry; instances
//! refer to them by [`ClipId`] only.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use throng_core::{ClipId, Result, ThrongError};

use crate::clip::AnimationClip;
use crate::hierarchy::BoneHierarchy;

slotmap::new_key_type! {
    pub struct ControllerKey;
}

/// A skeleton and the clips authored for it.
#[derive(Debug)]
pub struct AnimationController {
    key: ControllerKey,
    name: String,
    hierarchy: BoneHierarchy,
    animations: Vec<Arc<AnimationClip>>,
    named_animations: FxHashMap<String, usize>,
}

impl AnimationController {
    #[inline]
    #[must_use]
    pub fn key(&self) -> ControllerKey {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &BoneHierarchy {
        &self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.hierarchy.bone_count()
    }

    #[inline]
    #[must_use]
    pub fn bone_hierarchy_depth(&self) -> usize {
        self.hierarchy.max_depth()
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &[Arc<AnimationClip>] {
        &self.animations
    }

    /// The default animation bound at initialization.
    #[inline]
    #[must_use]
    pub fn first_animation(&self) -> Option<&Arc<AnimationClip>> {
        self.animations.first()
    }

    #[must_use]
    pub fn animation(&self, id: ClipId) -> Option<&Arc<AnimationClip>> {
        // Ids within a controller are contiguous.
        let first = self.animations.first()?.id().raw();
        let index = id.raw().checked_sub(first)? as usize;
        self.animations.get(index)
    }

    pub fn animation_by_name(&self, name: &str) -> Result<&Arc<AnimationClip>> {
        self.named_animations
            .get(name)
            .map(|&i| &self.animations[i])
            .ok_or_else(|| ThrongError::AnimationNotFound(name.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: ClipId) -> bool {
        self.animation(id).is_some()
    }
}

/// Long-lived owner of every clip, indexed by GPU animation id.
#[derive(Debug, Default)]
pub struct ClipRegistry {
    controllers: SlotMap<ControllerKey, Arc<AnimationController>>,
    /// `clips[i]` has id `i + 1`; id 0 is reserved.
    clips: Vec<Arc<AnimationClip>>,
}

impl ClipRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the clip family against `hierarchy`, assigns contiguous
    /// GPU ids and stores the controller.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        hierarchy: BoneHierarchy,
        clips: Vec<AnimationClip>,
    ) -> Result<Arc<AnimationController>> {
        let name = name.into();
        if clips.is_empty() {
            return Err(ThrongError::EmptyController(name));
        }

        let bone_count = hierarchy.bone_count();
        for clip in &clips {
            if clip.bone_count() != bone_count {
                return Err(ThrongError::BoneCountMismatch {
                    clip: clip.name().to_string(),
                    expected: bone_count,
                    actual: clip.bone_count(),
                });
            }
        }

        let mut animations = Vec::with_capacity(clips.len());
        let mut named_animations = FxHashMap::default();
        for (index, mut clip) in clips.into_iter().enumerate() {
            let id = ClipId::new((self.clips.len() + animations.len() + 1) as u32);
            clip.assign_id(id);
            named_animations.insert(clip.name().to_string(), index);
            animations.push(Arc::new(clip));
        }
        self.clips.extend(animations.iter().cloned());

        log::debug!(
            "Registered animation controller '{name}': {bone_count} bones, {} clips",
            animations.len()
        );

        let key = self.controllers.insert_with_key(|key| {
            Arc::new(AnimationController {
                key,
                name,
                hierarchy,
                animations,
                named_animations,
            })
        });
        Ok(Arc::clone(&self.controllers[key]))
    }

    #[must_use]
    pub fn controller(&self, key: ControllerKey) -> Option<&Arc<AnimationController>> {
        self.controllers.get(key)
    }

    pub fn controllers(&self) -> impl Iterator<Item = &Arc<AnimationController>> {
        self.controllers.values()
    }

    #[must_use]
    pub fn clip(&self, id: ClipId) -> Option<&Arc<AnimationClip>> {
        let index = id.raw().checked_sub(1)? as usize;
        self.clips.get(index)
    }

    /// All clips in id order, as laid out in the GPU animation buffer.
    #[inline]
    #[must_use]
    pub fn all_clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    #[must_use]
    pub fn max_bone_count(&self) -> usize {
        self.controllers.values().map(|c| c.bone_count()).max().unwrap_or(0)
    }

    #[must_use]
    pub fn max_hierarchy_depth(&self) -> usize {
        self.controllers
            .values()
            .map(|c| c.bone_hierarchy_depth())
            .max()
            .unwrap_or(0)
    }
}
