//! Attack wind-up resolution
//!
//! TaskKind::AttackWindUp сработал → стратегия владельца выполняет удар или выстрел.

use bevy::prelude::*;

use crate::combat::damage::{DamageEvents, DamageSource};
use crate::combat::projectile::Projectile;
use crate::combat::strategy::{AttackStrategy, MeleeStrike, RangedVolley};
use crate::components::{Collider, CollisionLayer, Enemy, Health};
use crate::spatial::{overlap_sphere, OverlapCandidate};
use crate::tasks::{TaskKind, TaskScheduler};
use crate::DeterministicRng;

/// Снаряд появляется перед владельцем, вне его коллайдера
const MUZZLE_OFFSET: f32 = 0.6;

type TargetQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Transform, &'static CollisionLayer, &'static Collider, &'static mut Health),
    Without<Enemy>,
>;

/// System: резолв сработавших wind-up'ов
///
/// Melee: владелец мёртв → тихий abort; иначе overlap по категории игрока.
/// Ranged: spawn снаряда(ов) вдоль forward с разбросом.
pub fn resolve_attack_wind_ups(
    mut commands: Commands,
    mut scheduler: ResMut<TaskScheduler>,
    mut rng: ResMut<DeterministicRng>,
    mut damage: DamageEvents,
    attackers: Query<(&Transform, &Health, &AttackStrategy, Option<&CollisionLayer>), With<Enemy>>,
    mut targets: TargetQuery,
) {
    for owner in scheduler.take_fired(TaskKind::AttackWindUp) {
        let Ok((transform, health, strategy, layer)) = attackers.get(owner) else {
            continue;
        };

        match strategy {
            AttackStrategy::Melee(strike) => {
                if health.current <= 0.0 {
                    continue;
                }
                melee_strike(owner, transform.translation, strike, &mut targets, &mut damage);
            }
            AttackStrategy::Ranged(volley) => {
                let shooter_layer = layer.copied().unwrap_or(CollisionLayer::ENEMY);
                fire_volley(&mut commands, owner, shooter_layer, transform, volley, &mut rng);
            }
        }
    }
}

fn melee_strike(
    owner: Entity,
    origin: Vec3,
    strike: &MeleeStrike,
    targets: &mut TargetQuery,
    damage: &mut DamageEvents,
) {
    let hits = overlap_sphere(
        origin,
        strike.range,
        CollisionLayer::PLAYER.0,
        targets.iter().map(|(entity, transform, layer, collider, _)| OverlapCandidate {
            entity,
            position: transform.translation,
            layer: layer.0,
            radius: collider.radius,
        }),
    );

    for target in hits {
        if let Ok((_, _, _, _, mut health)) = targets.get_mut(target) {
            damage.apply(Some(owner), target, &mut health, strike.damage, DamageSource::Melee);
        }
    }
}

fn fire_volley(
    commands: &mut Commands,
    owner: Entity,
    shooter_layer: CollisionLayer,
    transform: &Transform,
    volley: &RangedVolley,
    rng: &mut DeterministicRng,
) {
    let forward = transform.forward().as_vec3();

    for direction in volley.pellet_directions(forward, &mut rng.rng) {
        let origin = transform.translation + direction * MUZZLE_OFFSET;
        commands.spawn((
            Projectile::new(
                owner,
                shooter_layer.0,
                direction,
                volley.projectile_speed,
                volley.damage,
                volley.max_range,
            ),
            Transform::from_translation(origin),
        ));
    }

    crate::logger::log(&format!("🔫 Enemy {:?} fired at {:?}", owner, transform.translation));
}
