//! Spawn placement: где поставить группу
//!
//! База группы — rejection sampling в квадрате `±range` вокруг игрока,
//! луч вниз с высоты 10м, принимаем только землю не ближе min_distance к игроку.

use bevy::prelude::*;
use rand::Rng;

use crate::spatial::{Ground, RejectionSampler};

/// Высота старта spawn probe над игроком
pub const SPAWN_PROBE_HEIGHT: f32 = 10.0;

pub fn sample_group_origin<R: Rng + ?Sized>(
    sampler: &RejectionSampler,
    ground: &Ground,
    player: Vec3,
    range: f32,
    min_distance: f32,
    rng: &mut R,
) -> Option<Vec3> {
    sampler.sample(range, min_distance, |bounds| {
        let radius = bounds.radius.max(0.0);
        let probe = Vec3::new(
            player.x + rng.gen_range(-radius..=radius),
            player.y + SPAWN_PROBE_HEIGHT,
            player.z + rng.gen_range(-radius..=radius),
        );
        let hit = ground.raycast_down(probe, f32::INFINITY)?;
        (hit.distance(player) >= bounds.min_distance).then_some(hit)
    })
}

/// Позиция члена группы: ±jitter по XZ, на земле если она есть
pub fn jittered_member_position<R: Rng + ?Sized>(origin: Vec3, jitter: f32, ground: &Ground, rng: &mut R) -> Vec3 {
    let jitter = jitter.abs();
    let offset = Vec3::new(rng.gen_range(-jitter..=jitter), 0.0, rng.gen_range(-jitter..=jitter));
    let candidate = origin + offset;

    ground
        .raycast_down(candidate + Vec3::Y * SPAWN_PROBE_HEIGHT, f32::INFINITY)
        .unwrap_or(origin)
}
