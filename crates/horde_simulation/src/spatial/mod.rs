//! Spatial queries без физического движка
//!
//! - overlap_sphere: кто из damageable entity попал в сферу (melee)
//! - segment_sphere_hit: пересечение отрезка со сферой (projectiles)
//! - ground: `GroundQuery` (raycast вниз) + реализации
//! - sampling: bounded rejection sampler

use bevy::prelude::*;

pub mod ground;
pub mod sampling;

pub use ground::{FlatGround, Ground, GroundQuery, TileGround};
pub use sampling::{RejectionSampler, SampleBounds};

/// Кандидат для overlap теста
#[derive(Debug, Clone, Copy)]
pub struct OverlapCandidate {
    pub entity: Entity,
    pub position: Vec3,
    pub layer: CollisionLayerBits,
    pub radius: f32,
}

/// Сырые биты категории (чтобы spatial не зависел от components)
pub type CollisionLayerBits = u32;

/// Все кандидаты, чья сфера пересекает сферу `(center, radius)` и чья категория в `mask`
pub fn overlap_sphere(
    center: Vec3,
    radius: f32,
    mask: u32,
    candidates: impl IntoIterator<Item = OverlapCandidate>,
) -> Vec<Entity> {
    candidates
        .into_iter()
        .filter(|c| c.layer & mask != 0)
        .filter(|c| c.position.distance(center) <= radius + c.radius)
        .map(|c| c.entity)
        .collect()
}

/// Параметр t ∈ [0, 1] первого входа отрезка `start → end` в сферу
///
/// None — промах. Отрезок, начинающийся внутри сферы, даёт t = 0.
pub fn segment_sphere_hit(start: Vec3, end: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let segment = end - start;
    let to_start = start - center;

    let c = to_start.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let a = segment.length_squared();
    if a <= f32::EPSILON {
        return None;
    }

    let b = to_start.dot(segment);
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / a;
    (0.0..=1.0).contains(&t).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(index: u32, position: Vec3, layer: u32) -> OverlapCandidate {
        OverlapCandidate {
            entity: Entity::from_raw(index),
            position,
            layer,
            radius: 0.5,
        }
    }

    #[test]
    fn test_overlap_respects_mask_and_radius() {
        let hits = overlap_sphere(
            Vec3::ZERO,
            2.0,
            0b01,
            [
                candidate(1, Vec3::new(0.0, 0.0, 1.5), 0b01),
                candidate(2, Vec3::new(0.0, 0.0, 1.0), 0b10),  // wrong layer
                candidate(3, Vec3::new(0.0, 0.0, 2.4), 0b01),  // 2.4 ≤ 2.0 + 0.5
                candidate(4, Vec3::new(0.0, 0.0, 2.6), 0b01),  // too far
            ],
        );

        assert_eq!(hits, vec![Entity::from_raw(1), Entity::from_raw(3)]);
    }

    #[test]
    fn test_segment_hits_sphere_in_front() {
        let t = segment_sphere_hit(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, -5.0), 1.0);
        let t = t.expect("segment passes through sphere");
        assert!((t - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_segment_misses_sphere() {
        let t = segment_sphere_hit(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0), Vec3::new(3.0, 0.0, -5.0), 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn test_segment_stops_short_of_sphere() {
        let t = segment_sphere_hit(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert!(t.is_none());
    }
}
