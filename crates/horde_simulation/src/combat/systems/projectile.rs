//! Projectile flight: straight-line sweep + hit-once

use bevy::prelude::*;

use crate::combat::damage::{DamageEvents, DamageSource};
use crate::combat::projectile::Projectile;
use crate::components::{Collider, CollisionLayer, Health};
use crate::spatial::segment_sphere_hit;

/// System: двигаем снаряды и проверяем попадания
///
/// Sweep отрезка за тик против сфер damageable entity. Свою категорию
/// и самого стрелка пропускаем. Попадание → урон один раз + despawn.
pub fn move_projectiles(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut damage: DamageEvents,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    mut targets: Query<(Entity, &Transform, &CollisionLayer, &Collider, &mut Health), Without<Projectile>>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        let start = transform.translation;
        let step = (projectile.speed * delta).min((projectile.max_range - projectile.traveled).max(0.0));
        let end = start + projectile.direction * step;

        let hit = targets
            .iter()
            .filter(|(target, _, layer, _, _)| {
                *target != projectile.shooter && layer.0 != 0 && layer.0 != projectile.shooter_layer
            })
            .filter_map(|(target, target_transform, _, collider, _)| {
                segment_sphere_hit(start, end, target_transform.translation, collider.radius).map(|t| (target, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((target, _)) = hit {
            if let Ok((_, _, _, _, mut health)) = targets.get_mut(target) {
                damage.apply(
                    Some(projectile.shooter),
                    target,
                    &mut health,
                    projectile.damage,
                    DamageSource::Projectile,
                );
            }
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation = end;
        projectile.traveled += step;
        projectile.lifetime -= delta;

        if projectile.is_expired() {
            commands.entity(entity).despawn();
        }
    }
}
