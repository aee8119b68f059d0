//! The Sink interface: the owner of the GPU instance buffer.

use throng_core::{FrameClock, Result, SkeletonId, Ticks};

use crate::instance::InstanceData;

/// Owner of GPU-resident instance storage and identifier allocation.
///
/// Instance records never talk to the GPU themselves. They hand their
/// [`InstanceData`] to a `MeshInstancer`, which copies the dirty field
/// groups and clears the mask in the same call.
pub trait MeshInstancer {
    /// Global tick counter. Monotonic for the whole session.
    fn ticks(&self) -> Ticks;

    /// Current tick and seconds, as passed to instance mutators.
    fn clock(&self) -> FrameClock;

    /// Allocates an instance id and stores it in `instance`.
    fn initialize(&mut self, instance: &mut InstanceData) -> Result<()>;

    /// Releases the id held by `instance`. Released instances are no longer
    /// drawn.
    fn delete(&mut self, instance: &mut InstanceData) -> Result<()>;

    /// Deletes every instance, continuing past failures. Returns the first
    /// error.
    fn delete_many(&mut self, instances: &mut [InstanceData]) -> Result<()> {
        let mut result = Ok(());
        for instance in instances {
            result = result.and(self.delete(instance));
        }
        result
    }

    fn new_skeleton_id(&mut self) -> Result<SkeletonId>;

    fn release_skeleton_id(&mut self, id: SkeletonId);

    /// Stages the dirty fields of `instance` and clears its mask.
    fn append(&mut self, instance: &mut InstanceData) -> Result<()>;

    fn append_many(&mut self, instances: &mut [InstanceData]) -> Result<()> {
        for instance in instances {
            self.append(instance)?;
        }
        Ok(())
    }
}
