//! Bone hierarchy with a precomputed parent-first evaluation order.
//!
//! Bones whose parent is `None` hang off the root sentinel, i.e. the mesh
//! transform itself. On the GPU the sentinel is encoded as
//! [`ROOT_BONE_SENTINEL`].

use smallvec::SmallVec;
use throng_core::{Result, ThrongError};

/// GPU encoding of "parent is the mesh root".
pub const ROOT_BONE_SENTINEL: u32 = u32::MAX;

/// Bone chain from a root-level bone down to a target bone.
pub type BoneChain = SmallVec<[usize; 16]>;

#[derive(Debug, Clone)]
pub struct BoneHierarchy {
    parents: Vec<Option<usize>>,
    /// Parent-before-child order over all bones.
    order: Vec<usize>,
    /// Depth of each bone; root-level bones have depth 1.
    depths: Vec<usize>,
    max_depth: usize,
}

impl BoneHierarchy {
    /// Validates that `parents` forms a forest rooted at the sentinel.
    pub fn new(parents: Vec<Option<usize>>) -> Result<Self> {
        let count = parents.len();

        for (bone, parent) in parents.iter().enumerate() {
            if let Some(p) = *parent {
                if p >= count {
                    return Err(ThrongError::InvalidHierarchy(format!(
                        "bone {bone} references parent {p}, but there are only {count} bones"
                    )));
                }
                if p == bone {
                    return Err(ThrongError::InvalidHierarchy(format!(
                        "bone {bone} is its own parent"
                    )));
                }
            }
        }

        // Depths via memoized walks; a walk longer than `count` means a cycle.
        let mut depths = vec![0usize; count];
        let mut walk: Vec<usize> = Vec::new();
        for bone in 0..count {
            if depths[bone] != 0 {
                continue;
            }
            walk.clear();
            let mut current = Some(bone);
            let mut base = 0;
            while let Some(b) = current {
                if depths[b] != 0 {
                    base = depths[b];
                    break;
                }
                if walk.len() > count {
                    return Err(ThrongError::InvalidHierarchy(format!(
                        "cycle detected while walking up from bone {bone}"
                    )));
                }
                walk.push(b);
                current = parents[b];
            }
            for (i, &b) in walk.iter().rev().enumerate() {
                depths[b] = base + i + 1;
            }
        }

        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&b| depths[b]);
        let max_depth = depths.iter().copied().max().unwrap_or(0);

        Ok(Self {
            parents,
            order,
            depths,
            max_depth,
        })
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.parents.len()
    }

    /// Length of the deepest bone chain.
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.parents.get(bone).copied().flatten()
    }

    #[inline]
    #[must_use]
    pub fn depth(&self, bone: usize) -> usize {
        self.depths.get(bone).copied().unwrap_or(0)
    }

    #[inline]
    #[must_use]
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Parent indices as stored in the GPU skeleton buffer.
    #[must_use]
    pub fn gpu_parents(&self) -> Vec<u32> {
        self.parents
            .iter()
            .map(|p| p.map_or(ROOT_BONE_SENTINEL, |p| p as u32))
            .collect()
    }

    /// Bones in parent-first order.
    #[inline]
    #[must_use]
    pub fn evaluation_order(&self) -> &[usize] {
        &self.order
    }

    pub fn check_bone(&self, bone: usize) -> Result<()> {
        if bone >= self.bone_count() {
            return Err(ThrongError::InvalidBoneIndex {
                index: bone,
                bone_count: self.bone_count(),
            });
        }
        Ok(())
    }

    /// Root-first chain ending at `bone`.
    pub fn chain(&self, bone: usize) -> Result<BoneChain> {
        self.check_bone(bone)?;
        let mut chain = BoneChain::new();
        let mut current = Some(bone);
        while let Some(b) = current {
            chain.push(b);
            current = self.parents[b];
        }
        chain.reverse();
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_parent_first() {
        // 2 -> 0 -> 3, 1 is root-level
        let h = BoneHierarchy::new(vec![Some(2), None, None, Some(0)]).unwrap();
        let order = h.evaluation_order();
        let pos = |b: usize| order.iter().position(|&x| x == b).unwrap();
        assert!(pos(2) < pos(0));
        assert!(pos(0) < pos(3));
        assert_eq!(h.max_depth(), 3);
        assert_eq!(h.depth(1), 1);
    }

    #[test]
    fn detects_cycles() {
        let err = BoneHierarchy::new(vec![Some(1), Some(0)]).unwrap_err();
        assert!(matches!(err, ThrongError::InvalidHierarchy(_)));
    }

    #[test]
    fn detects_out_of_range_parent() {
        assert!(BoneHierarchy::new(vec![None, Some(7)]).is_err());
    }

    #[test]
    fn chain_is_root_first() {
        let h = BoneHierarchy::new(vec![None, Some(0), Some(1)]).unwrap();
        assert_eq!(h.chain(2).unwrap().as_slice(), &[0, 1, 2]);
        assert!(h.chain(3).is_err());
    }

    #[test]
    fn gpu_parents_use_sentinel() {
        let h = BoneHierarchy::new(vec![None, Some(0)]).unwrap();
        assert_eq!(h.gpu_parents(), vec![ROOT_BONE_SENTINEL, 0]);
    }
}
