//! Animation Data Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation and validation
//! - KeyframeCursor sequential and random access
//! - BoneAnimation bind defaults
//! - AnimationClip tick length and degenerate clips
//! - BoneHierarchy validation
//! - ClipRegistry id assignment and controller lookups

use std::f32::consts::FRAC_PI_3;

use glam::{Quat, Vec3};

use throng::animation::clip::{AnimationClip, BoneAnimation};
use throng::animation::controller::ClipRegistry;
use throng::animation::hierarchy::BoneHierarchy;
use throng::animation::tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
use throng::{ClipId, ThrongError};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn bones(count: usize, tick_length: u32) -> Vec<BoneAnimation> {
    (0..count).map(|_| BoneAnimation::new(tick_length)).collect()
}

// ============================================================================
// KeyframeTrack: Linear
// ============================================================================

#[test]
fn track_linear_f32_midpoint() {
    let track =
        KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Linear).unwrap();

    let mut cursor = KeyframeCursor::default();
    let val = track.sample_with_cursor(0.5, &mut cursor);
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
    assert!(approx(track.sample(0.5), 5.0));
}

#[test]
fn track_linear_clamps_outside_range() {
    let track =
        KeyframeTrack::new(vec![0.25, 0.75], vec![10.0_f32, 20.0], InterpolationMode::Linear)
            .unwrap();

    assert!(approx(track.sample(0.0), 10.0), "before first keyframe");
    assert!(approx(track.sample(1.0), 20.0), "after last keyframe");
}

#[test]
fn track_linear_vec3() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 20.0, 30.0)],
        InterpolationMode::Linear,
    )
    .unwrap();

    assert!(approx_vec3(track.sample(0.5), Vec3::new(5.0, 10.0, 15.0)));
}

#[test]
fn track_linear_quat_uses_slerp() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(2.0 * FRAC_PI_3)],
        InterpolationMode::Linear,
    )
    .unwrap();

    let mid = track.sample(0.5);
    let expected = Quat::from_rotation_y(FRAC_PI_3);
    assert!(mid.dot(expected).abs() > 1.0 - EPSILON, "Expected 60° about Y, got {mid:?}");
    let quarter = track.sample(0.25);
    let expected = Quat::from_rotation_y(FRAC_PI_3 * 0.5);
    assert!(
        quarter.dot(expected).abs() > 1.0 - EPSILON,
        "Expected 30° about Y, got {quarter:?}"
    );
    assert!(approx(mid.length(), 1.0), "slerp result must stay normalized");
}

// ============================================================================
// KeyframeTrack: Step / Cubic
// ============================================================================

#[test]
fn track_step_holds_previous_value() {
    let track =
        KeyframeTrack::new(vec![0.0, 0.5, 1.0], vec![1.0_f32, 2.0, 3.0], InterpolationMode::Step)
            .unwrap();

    assert!(approx(track.sample(0.49), 1.0));
    assert!(approx(track.sample(0.5), 2.0));
    assert!(approx(track.sample(0.99), 2.0));
}

#[test]
fn track_cubic_passes_through_keyframes() {
    // [in_tangent, value, out_tangent] per keyframe
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 1.0, 1.0, 4.0, 0.0],
        InterpolationMode::CubicSpline,
    )
    .unwrap();

    assert!(approx(track.sample(0.0), 0.0));
    assert!(approx(track.sample(1.0), 4.0));
    let mid = track.sample(0.5);
    assert!(mid > 0.0 && mid < 4.0, "cubic midpoint should lie between values, got {mid}");
}

#[test]
fn track_rejects_invalid_input() {
    assert!(matches!(
        KeyframeTrack::<f32>::new(vec![], vec![], InterpolationMode::Linear),
        Err(ThrongError::InvalidTrack(_))
    ));
    assert!(matches!(
        KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32], InterpolationMode::Linear),
        Err(ThrongError::InvalidTrack(_))
    ));
    assert!(matches!(
        KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32, 2.0], InterpolationMode::CubicSpline),
        Err(ThrongError::InvalidTrack(_))
    ));
}

// ============================================================================
// KeyframeCursor
// ============================================================================

#[test]
fn cursor_matches_stateless_sampling() {
    let times: Vec<f32> = (0..=20).map(|i| i as f32 / 20.0).collect();
    let values: Vec<f32> = times.iter().map(|t| t * t * 100.0).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear).unwrap();

    let mut cursor = KeyframeCursor::default();
    // Forward playback, then a jump back to the start, then a random jump.
    let samples = (0..50).map(|i| i as f32 / 50.0).chain([0.01, 0.93, 0.12]);
    for time in samples {
        let with_cursor = track.sample_with_cursor(time, &mut cursor);
        let stateless = track.sample(time);
        assert!(approx(with_cursor, stateless), "t={time}: {with_cursor} vs {stateless}");
    }
}

// ============================================================================
// BoneAnimation / AnimationClip
// ============================================================================

#[test]
fn bone_animation_defaults_to_bind_pose() {
    let bone = BoneAnimation::new(30);
    let pose = bone.sample(0.7);
    assert_eq!(pose.translation, Vec3::ZERO);
    assert_eq!(pose.rotation, Quat::IDENTITY);
    assert_eq!(pose.scale, Vec3::ONE);
}

#[test]
fn bone_animation_samples_its_tracks() {
    let bone = BoneAnimation::new(30)
        .with_position(
            KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Vec3::ZERO, Vec3::X * 4.0],
                InterpolationMode::Linear,
            )
            .unwrap(),
        )
        .with_scale(KeyframeTrack::constant(Vec3::splat(2.0)));

    assert!(approx_vec3(bone.interp_position(0.25), Vec3::X));
    assert!(approx_vec3(bone.interp_scale(0.9), Vec3::splat(2.0)));
    assert_eq!(bone.interp_rotation(0.5), Quat::IDENTITY);
}

#[test]
fn clip_tick_length_is_longest_bone() {
    let clip =
        AnimationClip::new("mixed", vec![BoneAnimation::new(40), BoneAnimation::new(90)]).unwrap();
    assert_eq!(clip.tick_length(), 90);
    assert!(approx(clip.duration_seconds(), 1.5));
    assert!(clip.id().is_none(), "unregistered clips have no GPU id");
}

#[test]
fn degenerate_clips_are_rejected() {
    assert_eq!(
        AnimationClip::new("empty", vec![]).unwrap_err(),
        ThrongError::DegenerateClip("empty".into())
    );
    assert!(matches!(
        AnimationClip::new("zero", vec![BoneAnimation::new(10), BoneAnimation::new(0)]),
        Err(ThrongError::DegenerateClip(_))
    ));
}

// ============================================================================
// ClipRegistry
// ============================================================================

#[test]
fn registry_assigns_contiguous_ids_from_one() {
    let mut registry = ClipRegistry::new();
    let hierarchy = BoneHierarchy::new(vec![None, Some(0)]).unwrap();
    let walker = registry
        .register(
            "walker",
            hierarchy.clone(),
            vec![
                AnimationClip::new("idle", bones(2, 30)).unwrap(),
                AnimationClip::new("walk", bones(2, 60)).unwrap(),
            ],
        )
        .unwrap();
    let runner = registry
        .register("runner", hierarchy, vec![AnimationClip::new("run", bones(2, 20)).unwrap()])
        .unwrap();

    let ids: Vec<u32> = walker.animations().iter().map(|c| c.id().raw()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(runner.first_animation().unwrap().id(), ClipId::new(3));

    assert_eq!(registry.all_clips().len(), 3);
    assert_eq!(registry.clip(ClipId::new(2)).unwrap().name(), "walk");
    assert!(registry.clip(ClipId::NONE).is_none());
    assert!(registry.controller(walker.key()).is_some());
}

#[test]
fn controller_lookups() {
    let mut registry = ClipRegistry::new();
    let hierarchy = BoneHierarchy::new(vec![None, Some(0), Some(1)]).unwrap();
    let controller = registry
        .register(
            "arm",
            hierarchy,
            vec![
                AnimationClip::new("raise", bones(3, 30)).unwrap(),
                AnimationClip::new("lower", bones(3, 30)).unwrap(),
            ],
        )
        .unwrap();

    assert_eq!(controller.bone_count(), 3);
    assert_eq!(controller.bone_hierarchy_depth(), 3);

    let lower = controller.animation_by_name("lower").unwrap();
    assert_eq!(controller.animation(lower.id()).unwrap().name(), "lower");
    assert!(matches!(
        controller.animation_by_name("wave"),
        Err(ThrongError::AnimationNotFound(_))
    ));
    assert!(!controller.contains(ClipId::new(99)));
    assert!(!controller.contains(ClipId::NONE));
}

#[test]
fn registry_reports_sizing_maxima() {
    let mut registry = ClipRegistry::new();
    assert_eq!(registry.max_bone_count(), 0);
    assert_eq!(registry.max_hierarchy_depth(), 0);

    let chain = BoneHierarchy::new(vec![None, Some(0), Some(1)]).unwrap();
    registry
        .register("chain", chain, vec![AnimationClip::new("sway", bones(3, 30)).unwrap()])
        .unwrap();
    let fan = BoneHierarchy::new(vec![None, Some(0), Some(0), Some(0), Some(0)]).unwrap();
    registry
        .register("fan", fan, vec![AnimationClip::new("spread", bones(5, 30)).unwrap()])
        .unwrap();

    assert_eq!(registry.max_bone_count(), 5, "widest controller wins");
    assert_eq!(registry.max_hierarchy_depth(), 3, "deepest controller wins");

    let mut names: Vec<&str> = registry.controllers().map(|c| c.name()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["chain", "fan"]);
}

#[test]
fn registry_rejects_bad_controllers() {
    let mut registry = ClipRegistry::new();
    let hierarchy = BoneHierarchy::new(vec![None, Some(0)]).unwrap();

    assert!(matches!(
        registry.register("empty", hierarchy.clone(), vec![]),
        Err(ThrongError::EmptyController(_))
    ));
    assert!(matches!(
        registry.register(
            "mismatch",
            hierarchy,
            vec![AnimationClip::new("one", bones(1, 30)).unwrap()],
        ),
        Err(ThrongError::BoneCountMismatch { expected: 2, actual: 1, .. })
    ));
    assert!(registry.all_clips().is_empty(), "failed registrations must not consume ids");
}
