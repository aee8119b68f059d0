//! In-memory reference Sink.
//!
//! [`StagingInstancer`] keeps a CPU mirror of the GPU instance buffer and a
//! set of slots changed since the last [`flush`](StagingInstancer::flush).
//! A renderer drains that set and uploads the listed slots; tests and the
//! headless demo inspect the mirror directly.

use throng_animation::{AnimationController, ClipRegistry};
use throng_core::{
    FrameClock, InstanceId, InstancerSettings, Result, SkeletonId, ThrongError, TickClock, Ticks,
};

use crate::gpu::GpuInstance;
use crate::instance::InstanceData;
use crate::instancer::MeshInstancer;

/// Dense identifier pool. Id 0 is reserved as "none"; released ids are
/// reused before fresh ones.
#[derive(Debug)]
struct IdPool {
    name: &'static str,
    capacity: usize,
    next: u32,
    free: Vec<u32>,
    live: Vec<bool>,
}

impl IdPool {
    fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            next: 1,
            free: Vec::new(),
            live: vec![false; capacity + 1],
        }
    }

    fn allocate(&mut self) -> Result<u32> {
        let id = if let Some(id) = self.free.pop() {
            id
        } else if (self.next as usize) <= self.capacity {
            let id = self.next;
            self.next += 1;
            id
        } else {
            return Err(ThrongError::IdPoolExhausted {
                pool: self.name,
                capacity: self.capacity,
            });
        };
        self.live[id as usize] = true;
        Ok(id)
    }

    /// Returns `false` if `id` was not live.
    fn release(&mut self, id: u32) -> bool {
        match self.live.get_mut(id as usize) {
            Some(live) if *live => {
                *live = false;
                self.free.push(id);
                true
            }
            _ => false,
        }
    }

    fn is_live(&self, id: u32) -> bool {
        self.live.get(id as usize).copied().unwrap_or(false)
    }

    fn live_count(&self) -> usize {
        (self.next as usize - 1) - self.free.len()
    }
}

/// Transfer statistics since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StagingStats {
    /// `append` calls that carried at least one dirty bit.
    pub appends: u64,
    /// Appends that hit a slot already pending upload.
    pub coalesced: u64,
    /// Slots handed out by `flush`.
    pub uploads: u64,
}

#[derive(Debug)]
pub struct StagingInstancer {
    settings: InstancerSettings,
    clock: TickClock,
    instances: IdPool,
    skeletons: IdPool,
    /// Indexed by instance id; slot 0 is never written.
    mirror: Vec<GpuInstance>,
    pending: Vec<u32>,
    is_pending: Vec<bool>,
    stats: StagingStats,
}

impl StagingInstancer {
    #[must_use]
    pub fn new(settings: InstancerSettings) -> Self {
        log::debug!(
            "Creating staging instancer: {} instances, {} skeletons",
            settings.max_instances,
            settings.max_skeletons
        );
        Self {
            instances: IdPool::new("instances", settings.max_instances),
            skeletons: IdPool::new("skeletons", settings.max_skeletons),
            mirror: vec![GpuInstance::default(); settings.max_instances + 1],
            is_pending: vec![false; settings.max_instances + 1],
            pending: Vec::new(),
            clock: TickClock::new(),
            stats: StagingStats::default(),
            settings,
        }
    }

    /// Sizes the bone and parent-depth limits for every controller in
    /// `registry`, then accepts each of them. Other limits come from `base`.
    pub fn for_registry(registry: &ClipRegistry, base: InstancerSettings) -> Result<Self> {
        let settings = InstancerSettings {
            num_skeleton_bones: registry.max_bone_count(),
            max_parent_depth: InstancerSettings::required_parent_depth(
                registry.max_hierarchy_depth(),
            ),
            ..base
        };
        let sink = Self::new(settings);
        for controller in registry.controllers() {
            sink.register_controller(controller)?;
        }
        Ok(sink)
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &InstancerSettings {
        &self.settings
    }

    /// Advances the global tick by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> FrameClock {
        self.clock.advance(dt)
    }

    /// Checks that a controller fits the configured GPU limits.
    pub fn register_controller(&self, controller: &AnimationController) -> Result<()> {
        let depth = InstancerSettings::required_parent_depth(controller.bone_hierarchy_depth());
        if depth > self.settings.max_parent_depth {
            return Err(ThrongError::HierarchyTooDeep {
                depth,
                max: self.settings.max_parent_depth,
            });
        }
        if controller.bone_count() > self.settings.num_skeleton_bones {
            return Err(ThrongError::InvalidHierarchy(format!(
                "controller '{}' has {} bones, instancer supports {}",
                controller.name(),
                controller.bone_count(),
                self.settings.num_skeleton_bones
            )));
        }
        log::debug!(
            "Controller '{}' accepted: {} bones, parent depth {depth}",
            controller.name(),
            controller.bone_count()
        );
        Ok(())
    }

    /// Mirror of the GPU slot for `id`, if it is live.
    #[must_use]
    pub fn gpu_instance(&self, id: InstanceId) -> Option<&GpuInstance> {
        if self.instances.is_live(id.raw()) {
            self.mirror.get(id.raw() as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn is_pending(&self, id: InstanceId) -> bool {
        self.is_pending.get(id.raw() as usize).copied().unwrap_or(false)
    }

    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    #[must_use]
    pub fn live_instances(&self) -> usize {
        self.instances.live_count()
    }

    #[inline]
    #[must_use]
    pub fn live_skeletons(&self) -> usize {
        self.skeletons.live_count()
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> StagingStats {
        self.stats
    }

    #[inline]
    #[must_use]
    pub fn upload_count(&self) -> u64 {
        self.stats.uploads
    }

    /// Drains the pending set in slot order.
    pub fn flush(&mut self) -> Vec<(InstanceId, GpuInstance)> {
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_unstable();

        let uploads: Vec<_> = pending
            .into_iter()
            .map(|id| {
                self.is_pending[id as usize] = false;
                (InstanceId::new(id), self.mirror[id as usize])
            })
            .collect();

        self.stats.uploads += uploads.len() as u64;
        if !uploads.is_empty() {
            log::trace!("Flushing {} instance uploads", uploads.len());
        }
        uploads
    }

    fn mark_pending(&mut self, id: u32) {
        let slot = &mut self.is_pending[id as usize];
        if *slot {
            self.stats.coalesced += 1;
        } else {
            *slot = true;
            self.pending.push(id);
        }
    }

    fn live_id(&self, instance: &InstanceData) -> Result<u32> {
        let id = instance.id().raw();
        if self.instances.is_live(id) {
            Ok(id)
        } else {
            Err(ThrongError::UnknownInstance(id))
        }
    }
}

impl Default for StagingInstancer {
    fn default() -> Self {
        Self::new(InstancerSettings::default())
    }
}

impl MeshInstancer for StagingInstancer {
    fn ticks(&self) -> Ticks {
        self.clock.ticks()
    }

    fn clock(&self) -> FrameClock {
        self.clock.now()
    }

    fn initialize(&mut self, instance: &mut InstanceData) -> Result<()> {
        let id = self.instances.allocate()?;
        self.mirror[id as usize] = GpuInstance::default();
        instance.set_id(InstanceId::new(id));
        log::trace!("Allocated instance {id}");
        Ok(())
    }

    fn delete(&mut self, instance: &mut InstanceData) -> Result<()> {
        let id = self.live_id(instance)?;
        self.instances.release(id);
        self.mirror[id as usize] = GpuInstance::default();
        // The cleared slot still has to reach the GPU.
        self.mark_pending(id);
        instance.set_id(InstanceId::NONE);
        instance.take_dirty();
        Ok(())
    }

    fn new_skeleton_id(&mut self) -> Result<SkeletonId> {
        self.skeletons.allocate().map(SkeletonId::new)
    }

    fn release_skeleton_id(&mut self, id: SkeletonId) {
        if !self.skeletons.release(id.raw()) {
            log::warn!("Released skeleton id {id} which was not allocated");
        }
    }

    fn append(&mut self, instance: &mut InstanceData) -> Result<()> {
        let id = self.live_id(instance)?;
        let flags = instance.take_dirty();
        if flags.is_empty() {
            return Ok(());
        }
        self.mirror[id as usize].apply(instance, flags);
        self.stats.appends += 1;
        self.mark_pending(id);
        log::trace!("Staged instance {id}: {flags:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_pool_reuses_released_ids() {
        let mut pool = IdPool::new("test", 3);
        let a = pool.allocate().unwrap();
        let b = pool.allocate().unwrap();
        assert_eq!((a, b), (1, 2));
        assert!(pool.release(a));
        assert!(!pool.release(a), "double release must be rejected");
        assert_eq!(pool.allocate().unwrap(), 1);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn id_pool_exhaustion() {
        let mut pool = IdPool::new("test", 1);
        pool.allocate().unwrap();
        assert!(matches!(
            pool.allocate(),
            Err(ThrongError::IdPoolExhausted { capacity: 1, .. })
        ));
    }
}
