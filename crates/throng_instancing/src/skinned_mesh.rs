//! Skinned Mesh
//!
//! One animated object: a root instance, optional sub-mesh instances that
//! share its skeleton, and a [`Skeleton`] with one instance per bone.
//!
//! # Lifecycle
//!
//! `Uninitialized -> Initialized -> Disposed`. Every mutator and query
//! requires `Initialized`; a failing call leaves the record untouched.
//!
//! # Animation state
//!
//! The root and every sub-mesh carry identical animation fields: clip A and
//! its clock offset, clip B and its clock offset, the blend factor, speed
//! and play-once flag. Each setter writes all handles and marks the matching
//! dirty bits; nothing reaches the GPU until [`SkinnedMesh::update_all`]
//! (or one of its narrower variants) hands the records to the Sink.
//!
//! # Cross-fade
//!
//! [`SkinnedMesh::cross_fade`] starts B phase-aligned with A at blend 0.
//! Each [`SkinnedMesh::refresh_cross_fade`] sets the blend to the linear
//! fade progress and promotes B into A once it reaches 1. A new fade
//! requested while one is running first completes the running one.

use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};
use smallvec::SmallVec;
use throng_animation::{
    AnimationClip, AnimationController, AnimationLayer, BoneEvaluator, BoneTransform,
    PlaybackClock, PoseSource, speed_to_raw,
};
use throng_core::time::seconds_to_ticks;
use throng_core::{
    ClipId, FrameClock, MeshTypeId, Result, SPEED_SCALE, SkeletonId, ThrongError, Ticks,
};

use crate::cross_fade::{CrossFade, CrossFadeStatus};
use crate::dirty::DirtyFlags;
use crate::instance::InstanceData;
use crate::instancer::MeshInstancer;
use crate::skeleton::Skeleton;

/// Sub-mesh handles stored inline before spilling to the heap.
pub type SubMeshes = SmallVec<[InstanceData; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    Disposed,
}

/// Playback parameters of a single animation slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParams {
    /// Playback rate; `0` freezes the pose. Negative speeds are rejected.
    pub speed: f32,
    /// Start offset into the clip, in seconds.
    pub start_time: f32,
    pub looping: bool,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            start_time: 0.0,
            looping: true,
        }
    }
}

impl PlaybackParams {
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_start_time(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }

    #[must_use]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

/// Parameters of an explicit two-animation blend.
///
/// Speed and looping apply to both slots; the GPU record has a single
/// speed and a single play-once flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendParams {
    pub speed: f32,
    pub start_a: f32,
    pub start_b: f32,
    pub looping: bool,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            start_a: 0.0,
            start_b: 0.0,
            looping: true,
        }
    }
}

/// Parameters of a cross-fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeParams {
    pub speed: f32,
    pub looping: bool,
}

impl Default for FadeParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            looping: true,
        }
    }
}

/// Construction parameters.
#[derive(Debug, Clone)]
pub struct SkinnedMeshDesc {
    /// Mesh types per LOD. Entry 0 of a level is the root, the rest are
    /// sub-meshes. Level 0 decides how many sub-meshes there are.
    pub lods: Vec<Vec<MeshTypeId>>,
    /// Clamped to the last available level.
    pub initial_lod: usize,
    pub controller: Arc<AnimationController>,
}

impl SkinnedMeshDesc {
    #[must_use]
    pub fn new(mesh_type: MeshTypeId, controller: Arc<AnimationController>) -> Self {
        Self {
            lods: vec![vec![mesh_type]],
            initial_lod: 0,
            controller,
        }
    }
}

#[derive(Debug)]
pub struct SkinnedMesh {
    mesh: InstanceData,
    sub_meshes: SubMeshes,
    skeleton: Skeleton,
    lifecycle: Lifecycle,
    /// Global tick at which the current animation clock was anchored.
    anim_tick_start: Ticks,
    cross_fade: Option<CrossFade>,
    deferred_update: bool,
}

impl SkinnedMesh {
    #[must_use]
    pub fn new(desc: SkinnedMeshDesc) -> Self {
        let SkinnedMeshDesc {
            lods,
            initial_lod,
            controller,
        } = desc;

        let level = lods.get(initial_lod).or_else(|| lods.last());
        let mesh_type_at = |slot: usize| {
            level
                .and_then(|types| types.get(slot))
                .copied()
                .unwrap_or(MeshTypeId::NONE)
        };

        let slots = lods.first().map_or(1, Vec::len).max(1);
        let sub_meshes = (1..slots).map(|slot| InstanceData::new(mesh_type_at(slot))).collect();

        Self {
            mesh: InstanceData::new(mesh_type_at(0)),
            sub_meshes,
            skeleton: Skeleton::new(controller),
            lifecycle: Lifecycle::Uninitialized,
            anim_tick_start: 0,
            cross_fade: None,
            deferred_update: false,
        }
    }

    // ========================================================================
    // Pre-initialization configuration
    // ========================================================================

    /// Sets the radius before initialization. Bone instances inherit twice
    /// this value.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.mesh.set_radius(radius);
        for sub in &mut self.sub_meshes {
            sub.set_radius(radius);
        }
        self
    }

    #[must_use]
    pub fn with_property_id(mut self, property_id: u32) -> Self {
        self.mesh.set_property_id(property_id);
        for sub in &mut self.sub_meshes {
            sub.set_property_id(property_id);
        }
        self
    }

    #[must_use]
    pub fn with_transform(mut self, position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        self.mesh.set_position(position);
        self.mesh.set_rotation(rotation);
        self.mesh.set_scale(scale);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &InstanceData {
        &self.mesh
    }

    #[inline]
    #[must_use]
    pub fn sub_meshes(&self) -> &[InstanceData] {
        &self.sub_meshes
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &Arc<AnimationController> {
        self.skeleton.controller()
    }

    /// GPU instances used by this object: one per bone plus the root.
    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.skeleton.bone_count() + 1
    }

    #[inline]
    #[must_use]
    pub fn animation_id(&self) -> ClipId {
        self.mesh.props().animation_id
    }

    #[inline]
    #[must_use]
    pub fn animation_id_b(&self) -> ClipId {
        self.mesh.props().animation_id_b
    }

    #[inline]
    #[must_use]
    pub fn blend_factor(&self) -> f32 {
        self.mesh.props().animation_blend
    }

    #[inline]
    #[must_use]
    pub fn anim_tick_start(&self) -> Ticks {
        self.anim_tick_start
    }

    #[inline]
    #[must_use]
    pub fn is_cross_fading(&self) -> bool {
        self.cross_fade.is_some()
    }

    #[inline]
    #[must_use]
    pub fn cross_fade_state(&self) -> Option<&CrossFade> {
        self.cross_fade.as_ref()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Allocates the root, sub-mesh and bone instances plus a skeleton id,
    /// and binds the controller's first animation.
    pub fn initialize(
        &mut self,
        sink: &mut dyn MeshInstancer,
        animation_culling: bool,
    ) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Initialized => return Err(ThrongError::AlreadyInitialized),
            Lifecycle::Disposed => return Err(ThrongError::Disposed { operation: "initialize" }),
        }
        if self.mesh.mesh_type().is_none() {
            return Err(ThrongError::MissingMeshType("root mesh"));
        }
        if self.sub_meshes.iter().any(|sub| sub.mesh_type().is_none()) {
            return Err(ThrongError::MissingMeshType("sub mesh"));
        }
        let first = self
            .controller()
            .first_animation()
            .map(|clip| clip.id())
            .ok_or_else(|| ThrongError::EmptyController(self.controller().name().to_string()))?;

        let skeleton_id = sink.new_skeleton_id()?;

        if let Err(err) = sink.initialize(&mut self.mesh) {
            sink.release_skeleton_id(skeleton_id);
            return Err(err);
        }
        self.mesh.set_skeleton_id(skeleton_id);

        for index in 0..self.sub_meshes.len() {
            if let Err(err) = sink.initialize(&mut self.sub_meshes[index]) {
                self.release_partial(sink, index, skeleton_id);
                return Err(err);
            }
            let root = self.mesh.id();
            let sub = &mut self.sub_meshes[index];
            sub.set_skeleton_id(skeleton_id);
            sub.set_parent(root);
        }

        for handle in self.handles_mut() {
            handle.set_animation_culling(animation_culling);
            handle.set_animation_id(first);
            handle.set_instance_ticks(0);
            handle.set_playback(SPEED_SCALE, false);
        }

        let bone_type = self.mesh.mesh_type();
        let bone_radius = 2.0 * self.mesh.radius();
        let property_id = self.mesh.property_id();
        if let Err(err) = self
            .skeleton
            .initialize_instances(sink, skeleton_id, bone_type, bone_radius, property_id)
        {
            self.release_partial(sink, self.sub_meshes.len(), skeleton_id);
            return Err(err);
        }
        self.skeleton.set_root_parent(self.mesh.id());

        self.anim_tick_start = sink.ticks();
        self.lifecycle = Lifecycle::Initialized;
        log::debug!(
            "Skinned mesh {} initialized: skeleton {skeleton_id}, {} instances",
            self.mesh.id(),
            self.instance_count()
        );
        Ok(())
    }

    /// Rolls back a failed `initialize`: releases the root, the first
    /// `sub_count` sub-meshes and the skeleton id.
    fn release_partial(
        &mut self,
        sink: &mut dyn MeshInstancer,
        sub_count: usize,
        skeleton_id: SkeletonId,
    ) {
        // The caller already holds the error being reported.
        let _ = sink.delete_many(&mut self.sub_meshes[..sub_count]);
        let _ = sink.delete(&mut self.mesh);
        sink.release_skeleton_id(skeleton_id);
        for handle in self.handles_mut() {
            handle.set_skeleton_id(SkeletonId::NONE);
            handle.take_dirty();
        }
    }

    /// Releases every instance and the skeleton id. Terminal.
    ///
    /// A Sink error does not stop the release. Every remaining handle is
    /// still offered back, the mesh still ends [`Lifecycle::Disposed`] and
    /// the first error is returned.
    ///
    /// Do not dispose in the same frame as an update that has not been
    /// flushed yet.
    pub fn dispose(&mut self, sink: &mut dyn MeshInstancer) -> Result<()> {
        self.ensure_initialized("dispose")?;
        let skeleton_id = self.mesh.skeleton_id();

        let bones = self.skeleton.dispose(sink);
        let sub_meshes = sink.delete_many(&mut self.sub_meshes);
        let root = sink.delete(&mut self.mesh);
        sink.release_skeleton_id(skeleton_id);

        self.sub_meshes.clear();
        self.cross_fade = None;
        self.deferred_update = false;
        self.anim_tick_start = 0;
        self.lifecycle = Lifecycle::Disposed;

        let result = bones.and(sub_meshes).and(root);
        match &result {
            Ok(()) => log::debug!("Skinned mesh disposed, skeleton {skeleton_id} released"),
            Err(err) => log::warn!("Skinned mesh disposed with a Sink error: {err}"),
        }
        result
    }

    fn ensure_initialized(&self, operation: &'static str) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Initialized => Ok(()),
            Lifecycle::Uninitialized => Err(ThrongError::NotInitialized { operation }),
            Lifecycle::Disposed => Err(ThrongError::Disposed { operation }),
        }
    }

    fn check_clip(&self, id: ClipId) -> Result<()> {
        if self.controller().contains(id) {
            Ok(())
        } else {
            Err(ThrongError::ClipNotFound(id.raw()))
        }
    }

    fn handles_mut(&mut self) -> impl Iterator<Item = &mut InstanceData> {
        std::iter::once(&mut self.mesh).chain(self.sub_meshes.iter_mut())
    }

    // ========================================================================
    // Transform
    // ========================================================================

    pub fn set_position(&mut self, position: Vec3) -> Result<()> {
        self.ensure_initialized("set position")?;
        self.mesh.set_position(position);
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Quat) -> Result<()> {
        self.ensure_initialized("set rotation")?;
        self.mesh.set_rotation(rotation);
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vec3) -> Result<()> {
        self.ensure_initialized("set scale")?;
        self.mesh.set_scale(scale);
        Ok(())
    }

    /// Sets the radius of the root and every sub-mesh.
    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        self.ensure_initialized("set radius")?;
        for handle in self.handles_mut() {
            handle.set_radius(radius);
        }
        Ok(())
    }

    pub fn set_animation_culling(&mut self, culling: bool) -> Result<()> {
        self.ensure_initialized("set animation culling")?;
        for handle in self.handles_mut() {
            handle.set_animation_culling(culling);
        }
        Ok(())
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Plays a single animation, anchored at the current tick.
    ///
    /// A running cross-fade is completed first; the blend slot is cleared.
    pub fn set_animation(
        &mut self,
        clock: FrameClock,
        clip: ClipId,
        params: PlaybackParams,
    ) -> Result<()> {
        self.ensure_initialized("set animation")?;
        self.check_clip(clip)?;
        let speed_raw = speed_to_raw(params.speed)?;
        let offset = seconds_to_ticks(params.start_time);

        self.complete_cross_fade()?;
        for handle in self.handles_mut() {
            handle.set_animation_id(clip);
            handle.set_instance_ticks(offset);
            handle.set_playback(speed_raw, !params.looping);
            if handle.props().animation_id_b.is_some() || handle.props().animation_blend > 0.0 {
                handle.set_animation_id_b(ClipId::NONE);
                handle.set_instance_ticks_b(0);
                handle.set_animation_blend(0.0);
            }
        }
        self.anim_tick_start = clock.ticks;
        Ok(())
    }

    pub fn set_animation_by_name(
        &mut self,
        clock: FrameClock,
        name: &str,
        params: PlaybackParams,
    ) -> Result<()> {
        self.ensure_initialized("set animation")?;
        let id = self.controller().animation_by_name(name)?.id();
        self.set_animation(clock, id, params)
    }

    /// Plays two animations at an explicit blend weight, without any
    /// automatic transition.
    ///
    /// A side keeps its clock offset when its clip is unchanged, so moving
    /// the weight around does not restart either animation.
    pub fn set_animation_blend(
        &mut self,
        a: ClipId,
        b: ClipId,
        blend: f32,
        params: BlendParams,
    ) -> Result<()> {
        self.ensure_initialized("set animation blend")?;
        self.check_clip(a)?;
        self.check_clip(b)?;
        let speed_raw = speed_to_raw(params.speed)?;

        self.complete_cross_fade()?;
        let a_changed = self.mesh.props().animation_id != a;
        let b_changed = self.mesh.props().animation_id_b != b;
        let start_a = seconds_to_ticks(params.start_a);
        let start_b = seconds_to_ticks(params.start_b);

        for handle in self.handles_mut() {
            let ticks_a = if a_changed { start_a } else { handle.props().instance_ticks };
            let ticks_b = if b_changed { start_b } else { handle.props().instance_ticks_b };
            handle.set_animation_id(a);
            handle.set_instance_ticks(ticks_a);
            handle.set_animation_id_b(b);
            handle.set_instance_ticks_b(ticks_b);
            handle.set_animation_blend(blend);
            handle.set_playback(speed_raw, !params.looping);
        }
        Ok(())
    }

    /// Changes only the blend weight, clamped to `[0, 1]`.
    pub fn set_blend_factor(&mut self, blend: f32) -> Result<()> {
        self.ensure_initialized("set blend factor")?;
        for handle in self.handles_mut() {
            handle.set_animation_blend(blend);
        }
        Ok(())
    }

    // ========================================================================
    // Cross-fade
    // ========================================================================

    /// Starts a timed transition to `clip` over `duration` seconds.
    pub fn cross_fade(
        &mut self,
        clock: FrameClock,
        clip: ClipId,
        duration: f32,
        params: FadeParams,
    ) -> Result<()> {
        self.ensure_initialized("cross fade")?;
        self.check_clip(clip)?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(ThrongError::InvalidFadeDuration(duration));
        }
        let speed_raw = speed_to_raw(params.speed)?;

        if self.complete_cross_fade()? {
            log::debug!("Cross-fade to {clip} interrupted a running fade");
        }

        for handle in self.handles_mut() {
            // Same offset as A: both slots start phase-aligned.
            let ticks_a = handle.props().instance_ticks;
            handle.set_animation_id_b(clip);
            handle.set_instance_ticks_b(ticks_a);
            handle.set_playback(speed_raw, !params.looping);
            handle.set_animation_blend(0.0);
        }
        self.cross_fade = Some(CrossFade::new(clip, clock.seconds, duration));
        log::debug!("Cross-fade to {clip} started: {duration}s");
        Ok(())
    }

    /// Forces a running fade to completion: B is promoted into A and the
    /// blend slot is cleared. Returns `false` when no fade was running.
    pub fn complete_cross_fade(&mut self) -> Result<bool> {
        self.ensure_initialized("complete cross fade")?;
        let Some(fade) = self.cross_fade.take() else {
            return Ok(false);
        };

        for handle in self.handles_mut() {
            let props = *handle.props();
            handle.set_animation_id(props.animation_id_b);
            handle.set_instance_ticks(props.instance_ticks_b);
            handle.set_animation_blend(0.0);
            handle.set_animation_id_b(ClipId::NONE);
            handle.set_instance_ticks_b(0);
        }
        log::debug!("Cross-fade to {} completed", fade.target());
        Ok(true)
    }

    /// Per-tick hook: advances a running fade and requests a deferred update.
    pub fn refresh_cross_fade(&mut self, clock: FrameClock) -> Result<CrossFadeStatus> {
        let status = self.advance_cross_fade(clock)?;
        if status != CrossFadeStatus::Idle {
            self.deferred_update = true;
        }
        Ok(status)
    }

    fn advance_cross_fade(&mut self, clock: FrameClock) -> Result<CrossFadeStatus> {
        self.ensure_initialized("refresh cross fade")?;
        let Some(fade) = self.cross_fade else {
            return Ok(CrossFadeStatus::Idle);
        };

        let progress = fade.progress(clock.seconds);
        self.set_blend_factor(progress)?;
        if progress >= 1.0 {
            self.complete_cross_fade()?;
            Ok(CrossFadeStatus::Completed)
        } else {
            Ok(CrossFadeStatus::Fading(progress))
        }
    }

    // ========================================================================
    // Deferred update
    // ========================================================================

    /// Marks the record for publication by a later
    /// [`poll_deferred_update`](Self::poll_deferred_update).
    #[inline]
    pub fn request_deferred_update(&mut self) {
        self.deferred_update = true;
    }

    #[inline]
    #[must_use]
    pub fn is_deferred_update_requested(&self) -> bool {
        self.deferred_update
    }

    /// If an update was requested: clears the request, advances a running
    /// fade and publishes everything. Returns whether it ran.
    pub fn poll_deferred_update(
        &mut self,
        clock: FrameClock,
        sink: &mut dyn MeshInstancer,
    ) -> Result<bool> {
        if !self.deferred_update {
            return Ok(false);
        }
        self.ensure_initialized("poll deferred update")?;
        self.deferred_update = false;
        self.advance_cross_fade(clock)?;
        self.update_all(sink)?;
        Ok(true)
    }

    // ========================================================================
    // Publication
    // ========================================================================

    /// Publishes the root, sub-meshes and bone instances.
    pub fn update_all(&mut self, sink: &mut dyn MeshInstancer) -> Result<()> {
        self.ensure_initialized("update")?;
        sink.append(&mut self.mesh)?;
        sink.append_many(&mut self.sub_meshes)?;
        self.skeleton.update(sink)
    }

    pub fn update_root(&mut self, sink: &mut dyn MeshInstancer) -> Result<()> {
        self.ensure_initialized("update")?;
        sink.append(&mut self.mesh)
    }

    /// Publishes the root and sub-meshes.
    pub fn update_mesh(&mut self, sink: &mut dyn MeshInstancer) -> Result<()> {
        self.ensure_initialized("update")?;
        sink.append(&mut self.mesh)?;
        sink.append_many(&mut self.sub_meshes)
    }

    /// Dirty bits of the root instance not yet consumed by the Sink.
    #[inline]
    #[must_use]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.mesh.dirty()
    }

    // ========================================================================
    // Bone queries
    // ========================================================================

    /// Clip A, falling back to the controller's first animation.
    fn resolve_clip_a(&self) -> Option<&Arc<AnimationClip>> {
        let controller = self.controller();
        let id = self.mesh.props().animation_id;
        controller.animation(id).or_else(|| {
            log::warn!(
                "Animation {id} is not part of controller '{}', using its first animation",
                controller.name()
            );
            controller.first_animation()
        })
    }

    fn playback_clock(&self) -> PlaybackClock {
        let props = self.mesh.props();
        PlaybackClock::new(self.anim_tick_start, props.animation_speed_raw, !props.play_once)
    }

    /// Evaluates with the published state. Returns `None` when the
    /// controller has no clip to fall back to.
    fn with_pose_source<R>(
        &self,
        f: impl FnOnce(&PoseSource<'_>) -> Result<R>,
    ) -> Result<Option<R>> {
        let Some(clip_a) = self.resolve_clip_a() else {
            return Ok(None);
        };
        let props = self.mesh.props();
        let a = AnimationLayer::new(clip_a, props.instance_ticks);

        let clip_b = if props.animation_blend > 0.0 {
            self.controller().animation(props.animation_id_b)
        } else {
            None
        };
        let source = match clip_b {
            Some(clip_b) => PoseSource::Blend {
                a,
                b: AnimationLayer::new(clip_b, props.instance_ticks_b),
                weight: props.animation_blend,
            },
            None => PoseSource::Single(a),
        };
        f(&source).map(Some)
    }

    /// World transform of `bone` at `clock`, consistent with what the GPU
    /// evaluates from the same published state.
    pub fn bone_world_matrix(&self, clock: FrameClock, bone: usize) -> Result<Affine3A> {
        self.ensure_initialized("query bone transform")?;
        let hierarchy = self.controller().hierarchy();
        hierarchy.check_bone(bone)?;

        let mesh_world = self.mesh.world_matrix();
        let evaluator = BoneEvaluator::new(hierarchy, self.playback_clock(), clock.ticks);
        let world = self.with_pose_source(|source| evaluator.bone_world(mesh_world, bone, source))?;
        Ok(world.unwrap_or(mesh_world))
    }

    /// World position, rotation and scale of `bone`.
    pub fn bone_world_trs(&self, clock: FrameClock, bone: usize) -> Result<BoneTransform> {
        self.bone_world_matrix(clock, bone)
            .map(|world| BoneTransform::from_affine(&world))
    }

    /// World transforms of every bone, indexed by bone.
    pub fn evaluate_pose(&self, clock: FrameClock, out: &mut Vec<Affine3A>) -> Result<()> {
        self.ensure_initialized("evaluate pose")?;
        let hierarchy = self.controller().hierarchy();
        let mesh_world = self.mesh.world_matrix();
        let evaluator = BoneEvaluator::new(hierarchy, self.playback_clock(), clock.ticks);
        let evaluated =
            self.with_pose_source(|source| evaluator.evaluate_pose(mesh_world, source, out))?;
        if evaluated.is_none() {
            out.clear();
            out.resize(hierarchy.bone_count(), mesh_world);
        }
        Ok(())
    }
}
