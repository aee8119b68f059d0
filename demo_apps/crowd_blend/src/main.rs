//! Crowd Blend Demo
//!
//! Headless version of a crowd scene: a grid of skinned instances playing
//! random animations at random speeds, one instance driven by an explicit
//! two-clip blend, and a handful of instances cross-fading periodically.
//! Every frame the staging Sink collects the sparse uploads a renderer
//! would send to the GPU.
//!
//! ```text
//! RUST_LOG=info cargo run -p crowd_blend
//! ```

use std::sync::Arc;

use anyhow::Context;
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use throng::prelude::*;

const GRID: usize = 12;
const SPACING: f32 = 1.5;
const FRAMES: usize = 600;
const DT: f32 = 1.0 / 60.0;

const BLEND_PERIOD: f32 = 4.0;
const BLEND_EPSILON: f32 = 0.001;
const FADE_EVERY_FRAMES: usize = 90;
const FADE_SECONDS: f32 = 0.5;

/// Six bones swinging about `axis` by `angle`, bobbing up by `lift` mid-cycle.
fn swing(ticks: u32, axis: Vec3, angle: f32, lift: f32) -> throng::Result<Vec<BoneAnimation>> {
    (0..6)
        .map(|bone| -> throng::Result<BoneAnimation> {
            let rotation = KeyframeTrack::new(
                vec![0.0, 0.5, 1.0],
                vec![
                    Quat::from_axis_angle(axis, -angle),
                    Quat::from_axis_angle(axis, angle),
                    Quat::from_axis_angle(axis, -angle),
                ],
                InterpolationMode::Linear,
            )?;
            let offset = if bone == 0 { Vec3::ZERO } else { Vec3::Y * 0.4 };
            let position = KeyframeTrack::new(
                vec![0.0, 0.5, 1.0],
                vec![offset, offset + Vec3::Y * lift, offset],
                InterpolationMode::Linear,
            )?;
            Ok(BoneAnimation::new(ticks).with_position(position).with_rotation(rotation))
        })
        .collect()
}

/// A small creature: a four-bone spine with a two-bone tail off the pelvis.
fn build_controller(registry: &mut ClipRegistry) -> throng::Result<Arc<AnimationController>> {
    let hierarchy = BoneHierarchy::new(vec![None, Some(0), Some(1), Some(2), Some(0), Some(4)])?;
    let clips = vec![
        AnimationClip::new("idle", swing(120, Vec3::X, 0.05, 0.0)?)?,
        AnimationClip::new("walk", swing(60, Vec3::X, 0.25, 0.05)?)?,
        AnimationClip::new("run", swing(36, Vec3::X, 0.45, 0.15)?)?,
        AnimationClip::new("crawl", swing(90, Vec3::Z, 0.30, 0.0)?)?,
        AnimationClip::new("attack", swing(48, Vec3::Y, 0.60, 0.10)?)?,
    ];
    registry.register("parasite", hierarchy, clips)
}

/// Triangle wave in `[0, 1]`.
fn triangle(seconds: f32, period: f32) -> f32 {
    let phase = (seconds / period).fract();
    1.0 - (2.0 * phase - 1.0).abs()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut registry = ClipRegistry::new();
    let controller = build_controller(&mut registry)?;
    let clips: Vec<ClipId> = controller.animations().iter().map(|clip| clip.id()).collect();

    let mut sink = StagingInstancer::for_registry(&registry, InstancerSettings::default())?;
    let culling = sink.settings().animation_culling;

    let mut rng = StdRng::seed_from_u64(7);
    let mut meshes = Vec::with_capacity(GRID * GRID);
    for i in 0..GRID {
        for j in 0..GRID {
            let position = Vec3::new(i as f32 * SPACING, 0.0, j as f32 * SPACING);
            let desc = SkinnedMeshDesc::new(MeshTypeId::new(1), Arc::clone(&controller));
            let mut mesh = SkinnedMesh::new(desc)
                .with_radius(1.75)
                .with_transform(position, Quat::IDENTITY, Vec3::ONE);
            mesh.initialize(&mut sink, culling)
                .with_context(|| format!("initializing instance ({i}, {j})"))?;

            let clip = clips[rng.random_range(0..clips.len())];
            let params = PlaybackParams::default()
                .with_speed(rng.random_range(0.1..3.0))
                .with_start_time(rng.random_range(0.0..1.0));
            mesh.set_animation(sink.clock(), clip, params)?;
            mesh.update_all(&mut sink)?;
            meshes.push(mesh);
        }
    }

    let initial = sink.flush();
    log::info!(
        "Spawned {} skinned meshes, {} instances uploaded, {} skeletons live",
        meshes.len(),
        initial.len(),
        sink.live_skeletons()
    );

    // Instance (0, 0) blends crawl and attack by hand.
    let mut blend = 0.0;
    meshes[0].set_animation_blend(clips[2], clips[4], blend, BlendParams::default())?;
    meshes[0].update_all(&mut sink)?;

    let mut pose = Vec::new();
    for frame in 0..FRAMES {
        let clock = sink.update(DT);

        let target = triangle(clock.seconds, BLEND_PERIOD);
        if (target - blend).abs() > BLEND_EPSILON {
            blend = target;
            meshes[0].set_blend_factor(blend)?;
            meshes[0].update_root(&mut sink)?;
        }

        if frame % FADE_EVERY_FRAMES == 0 {
            for mesh in meshes.iter_mut().skip(1).step_by(7) {
                let clip = clips[rng.random_range(0..clips.len())];
                mesh.cross_fade(clock, clip, FADE_SECONDS, FadeParams::default())?;
                mesh.update_mesh(&mut sink)?;
            }
        }

        let mut completed = 0;
        for mesh in meshes.iter_mut().skip(1) {
            if mesh.refresh_cross_fade(clock)? == CrossFadeStatus::Completed {
                completed += 1;
            }
            mesh.poll_deferred_update(clock, &mut sink)?;
        }

        let uploads = sink.flush();
        if frame % 60 == 0 {
            meshes[0].evaluate_pose(clock, &mut pose)?;
            let tip = pose.last().context("controller has no bones")?;
            log::info!(
                "t={:.2}s blend={blend:.3} uploads={} fades_completed={completed} tail_tip={:?}",
                clock.seconds,
                uploads.len(),
                Vec3::from(tip.translation)
            );
            for bone in 0..meshes[0].controller().bone_count() {
                let trs = meshes[0].bone_world_trs(clock, bone)?;
                log::debug!(
                    "  bone {bone}: t={:?} r={:?} s={:?}",
                    trs.translation,
                    trs.rotation,
                    trs.scale
                );
            }
        }
    }

    let stats = sink.stats();
    log::info!(
        "Done: {} appends, {} coalesced, {} records uploaded",
        stats.appends,
        stats.coalesced,
        stats.uploads
    );

    for mesh in &mut meshes {
        mesh.dispose(&mut sink)?;
    }
    sink.flush();
    log::info!(
        "Disposed: {} instances, {} skeletons live",
        sink.live_instances(),
        sink.live_skeletons()
    );
    Ok(())
}
