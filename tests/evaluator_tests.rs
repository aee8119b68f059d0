//! Bone Evaluator Tests
//!
//! Tests for:
//! - Hierarchical composition (parent world * local)
//! - Single-bone chains vs. full parent-first pose evaluation
//! - Per-bone blending of two animations
//! - Play-once clamping through the evaluator

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};
use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};

use throng::animation::{
    AnimationClip, AnimationController, AnimationLayer, BoneAnimation, BoneEvaluator, BoneHierarchy,
    ClipRegistry, InterpolationMode, KeyframeTrack, PlaybackClock, PoseSource,
};
use throng::{SPEED_SCALE, ThrongError};

const EPSILON: f32 = 1e-4;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn linear(from: Vec3, to: Vec3) -> KeyframeTrack<Vec3> {
    KeyframeTrack::new(vec![0.0, 1.0], vec![from, to], InterpolationMode::Linear).unwrap()
}

/// Two-bone chain (0 -> 1) with four clips.
fn controller() -> Arc<AnimationController> {
    let hierarchy = BoneHierarchy::new(vec![None, Some(0)]).unwrap();

    let slide = AnimationClip::new(
        "slide",
        vec![
            BoneAnimation::new(100).with_position(linear(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0))),
            BoneAnimation::new(100).with_position(KeyframeTrack::constant(Vec3::Y)),
        ],
    )
    .unwrap();
    let lift = AnimationClip::new(
        "lift",
        vec![
            BoneAnimation::new(100).with_position(linear(Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0))),
            BoneAnimation::new(100).with_position(KeyframeTrack::constant(Vec3::Y * 2.0)),
        ],
    )
    .unwrap();
    let bent = AnimationClip::new(
        "bent",
        vec![
            BoneAnimation::new(60)
                .with_rotation(KeyframeTrack::constant(Quat::from_rotation_z(FRAC_PI_2))),
            BoneAnimation::new(60).with_position(KeyframeTrack::constant(Vec3::X)),
        ],
    )
    .unwrap();
    let straight = AnimationClip::new(
        "straight",
        vec![
            BoneAnimation::new(60),
            BoneAnimation::new(60).with_position(KeyframeTrack::constant(Vec3::X)),
        ],
    )
    .unwrap();

    let mut registry = ClipRegistry::new();
    registry
        .register("chain", hierarchy, vec![slide, lift, bent, straight])
        .unwrap()
}

fn clip<'a>(controller: &'a AnimationController, name: &str) -> &'a AnimationClip {
    controller.animation_by_name(name).unwrap()
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn bone_world_composes_down_the_chain() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let evaluator = BoneEvaluator::new(controller.hierarchy(), PlaybackClock::default(), 25);
    let source = PoseSource::Single(AnimationLayer::new(slide, 0));

    let root = evaluator.bone_world(Affine3A::IDENTITY, 0, &source).unwrap();
    let child = evaluator.bone_world(Affine3A::IDENTITY, 1, &source).unwrap();

    assert!(approx_vec3(root.translation.into(), Vec3::new(2.5, 0.0, 0.0)));
    assert!(approx_vec3(child.translation.into(), Vec3::new(2.5, 1.0, 0.0)));
}

#[test]
fn root_level_bones_compose_with_mesh_world() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let evaluator = BoneEvaluator::new(controller.hierarchy(), PlaybackClock::default(), 25);
    let source = PoseSource::Single(AnimationLayer::new(slide, 0));

    let mesh_world = Affine3A::from_translation(Vec3::new(100.0, 0.0, 0.0));
    let child = evaluator.bone_world(mesh_world, 1, &source).unwrap();
    assert!(approx_vec3(child.translation.into(), Vec3::new(102.5, 1.0, 0.0)));
}

#[test]
fn parent_rotation_moves_children() {
    let controller = controller();
    let bent = clip(&controller, "bent");
    let evaluator = BoneEvaluator::new(controller.hierarchy(), PlaybackClock::default(), 0);
    let source = PoseSource::Single(AnimationLayer::new(bent, 0));

    let child = evaluator.bone_world(Affine3A::IDENTITY, 1, &source).unwrap();
    assert!(approx_vec3(child.translation.into(), Vec3::Y), "got {:?}", child.translation);
}

#[test]
fn full_pose_matches_single_bone_queries() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let lift = clip(&controller, "lift");
    let clock = PlaybackClock::new(7, 15, true);
    let mesh_world = Affine3A::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::from_rotation_y(0.3),
        Vec3::new(-4.0, 1.0, 9.0),
    );

    for now in [7_u64, 40, 133, 999] {
        let evaluator = BoneEvaluator::new(controller.hierarchy(), clock, now);
        let source = PoseSource::Blend {
            a: AnimationLayer::new(slide, 3),
            b: AnimationLayer::new(lift, 11),
            weight: 0.4,
        };

        let mut pose = Vec::new();
        evaluator.evaluate_pose(mesh_world, &source, &mut pose).unwrap();
        assert_eq!(pose.len(), 2);

        for (bone, world) in pose.iter().enumerate() {
            let single = evaluator.bone_world(mesh_world, bone, &source).unwrap();
            assert!(world.abs_diff_eq(single, EPSILON), "tick {now}, bone {bone}");
        }
    }
}

#[test]
fn invalid_bone_index_is_rejected() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let evaluator = BoneEvaluator::new(controller.hierarchy(), PlaybackClock::default(), 0);
    let source = PoseSource::Single(AnimationLayer::new(slide, 0));

    assert_eq!(
        evaluator.bone_world(Affine3A::IDENTITY, 2, &source),
        Err(ThrongError::InvalidBoneIndex { index: 2, bone_count: 2 })
    );
}

// ============================================================================
// Blending
// ============================================================================

#[test]
fn blend_extremes_match_pure_animations() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let lift = clip(&controller, "lift");
    let clock = PlaybackClock::default();

    for now in [0_u64, 13, 50, 77, 260] {
        let evaluator = BoneEvaluator::new(controller.hierarchy(), clock, now);
        let a = AnimationLayer::new(slide, 5);
        let b = AnimationLayer::new(lift, 20);

        for bone in 0..2 {
            let pure_a = evaluator
                .bone_world(Affine3A::IDENTITY, bone, &PoseSource::Single(a))
                .unwrap();
            let pure_b = evaluator
                .bone_world(Affine3A::IDENTITY, bone, &PoseSource::Single(b))
                .unwrap();
            let at_zero = evaluator
                .bone_world(Affine3A::IDENTITY, bone, &PoseSource::Blend { a, b, weight: 0.0 })
                .unwrap();
            let at_one = evaluator
                .bone_world(Affine3A::IDENTITY, bone, &PoseSource::Blend { a, b, weight: 1.0 })
                .unwrap();

            assert!(at_zero.abs_diff_eq(pure_a, EPSILON), "blend=0 must equal A (tick {now})");
            assert!(at_one.abs_diff_eq(pure_b, EPSILON), "blend=1 must equal B (tick {now})");
        }
    }
}

#[test]
fn blending_is_per_bone_before_composition() {
    let controller = controller();
    let bent = clip(&controller, "bent");
    let straight = clip(&controller, "straight");
    let evaluator = BoneEvaluator::new(controller.hierarchy(), PlaybackClock::default(), 0);

    let source = PoseSource::Blend {
        a: AnimationLayer::new(bent, 0),
        b: AnimationLayer::new(straight, 0),
        weight: 0.5,
    };
    let child = evaluator.bone_world(Affine3A::IDENTITY, 1, &source).unwrap();

    // The parent rotation is slerped to 45° before the child is composed.
    // Blending the two final matrices instead would give (0.5, 0.5, 0).
    let expected = Vec3::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0);
    assert!(approx_vec3(child.translation.into(), expected), "got {:?}", child.translation);
}

#[test]
fn out_of_range_weight_is_clamped() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let lift = clip(&controller, "lift");
    let evaluator = BoneEvaluator::new(controller.hierarchy(), PlaybackClock::default(), 30);
    let a = AnimationLayer::new(slide, 0);
    let b = AnimationLayer::new(lift, 0);

    let over = evaluator
        .bone_world(Affine3A::IDENTITY, 1, &PoseSource::Blend { a, b, weight: 3.0 })
        .unwrap();
    let pure_b = evaluator.bone_world(Affine3A::IDENTITY, 1, &PoseSource::Single(b)).unwrap();
    assert!(over.abs_diff_eq(pure_b, EPSILON));
}

// ============================================================================
// Clock integration
// ============================================================================

#[test]
fn play_once_holds_the_last_tick() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let clock = PlaybackClock::new(0, SPEED_SCALE, false);
    let evaluator = BoneEvaluator::new(controller.hierarchy(), clock, 500);

    let root = evaluator
        .bone_world(Affine3A::IDENTITY, 0, &PoseSource::Single(AnimationLayer::new(slide, 0)))
        .unwrap();
    // phase = 99 of 100 ticks
    assert!(approx_vec3(root.translation.into(), Vec3::new(9.9, 0.0, 0.0)));
}

#[test]
fn looping_wraps_around() {
    let controller = controller();
    let slide = clip(&controller, "slide");
    let evaluator = BoneEvaluator::new(controller.hierarchy(), PlaybackClock::default(), 250);

    let root = evaluator
        .bone_world(Affine3A::IDENTITY, 0, &PoseSource::Single(AnimationLayer::new(slide, 0)))
        .unwrap();
    // phase = 50 of 100 ticks
    assert!(approx_vec3(root.translation.into(), Vec3::new(5.0, 0.0, 0.0)));
}
