//! Per-bone GPU instances of one skinned mesh.
//!
//! Every bone owns an instance slot so that attachments can be parented to
//! it and the GPU evaluator has somewhere to write the bone's world
//! transform. Bone instance `i` is parented to the instance of bone
//! `parent(i)`; root-level bones are parented to the mesh root.

use std::sync::Arc;

use throng_animation::AnimationController;
use throng_core::{InstanceId, MeshTypeId, Result, SkeletonId};

use crate::instance::InstanceData;
use crate::instancer::MeshInstancer;

#[derive(Debug)]
pub struct Skeleton {
    controller: Arc<AnimationController>,
    bones: Vec<InstanceData>,
    skeleton_id: SkeletonId,
}

impl Skeleton {
    #[must_use]
    pub fn new(controller: Arc<AnimationController>) -> Self {
        Self {
            controller,
            bones: Vec::new(),
            skeleton_id: SkeletonId::NONE,
        }
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &Arc<AnimationController> {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.controller.bone_count()
    }

    #[inline]
    #[must_use]
    pub fn skeleton_id(&self) -> SkeletonId {
        self.skeleton_id
    }

    /// Bone instances, indexed by bone. Empty until initialized.
    #[inline]
    #[must_use]
    pub fn bone_instances(&self) -> &[InstanceData] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone_instance(&self, bone: usize) -> Option<&InstanceData> {
        self.bones.get(bone)
    }

    /// Allocates one instance per bone and links them along the hierarchy.
    ///
    /// On failure every instance allocated so far is released again.
    pub fn initialize_instances(
        &mut self,
        sink: &mut dyn MeshInstancer,
        skeleton_id: SkeletonId,
        bone_type: MeshTypeId,
        radius: f32,
        property_id: u32,
    ) -> Result<()> {
        let hierarchy = self.controller.hierarchy();
        let mut bones = Vec::with_capacity(hierarchy.bone_count());

        for bone in 0..hierarchy.bone_count() {
            let mut data = InstanceData::new(bone_type);
            data.set_skeleton_id(skeleton_id);
            data.set_bone(bone as u32);
            data.set_radius(radius);
            data.set_property_id(property_id);
            if let Err(err) = sink.initialize(&mut data) {
                // Already failing; report the allocation error.
                let _ = sink.delete_many(&mut bones);
                return Err(err);
            }
            bones.push(data);
        }

        for bone in 0..bones.len() {
            if let Some(parent) = hierarchy.parent(bone) {
                let parent_id = bones[parent].id();
                bones[bone].set_parent(parent_id);
            }
        }

        self.bones = bones;
        self.skeleton_id = skeleton_id;
        Ok(())
    }

    /// Parents every root-level bone instance to the mesh root.
    pub fn set_root_parent(&mut self, root: InstanceId) {
        let hierarchy = self.controller.hierarchy();
        for (bone, data) in self.bones.iter_mut().enumerate() {
            if hierarchy.parent(bone).is_none() {
                data.set_parent(root);
            }
        }
    }

    /// Publishes dirty bone instances.
    pub fn update(&mut self, sink: &mut dyn MeshInstancer) -> Result<()> {
        sink.append_many(&mut self.bones)
    }

    /// Releases every bone instance. The skeleton id is released by the
    /// owning mesh. The bones are dropped even when the Sink reports an error.
    pub fn dispose(&mut self, sink: &mut dyn MeshInstancer) -> Result<()> {
        let result = sink.delete_many(&mut self.bones);
        self.bones.clear();
        self.skeleton_id = SkeletonId::NONE;
        result
    }
}
