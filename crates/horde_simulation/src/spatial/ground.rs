//! Ground probes: "есть ли под точкой земля"
//!
//! Patrol проверяет walk point лучом вниз на 2м, spawner — бесконечным лучом с высоты 10м.

use bevy::prelude::*;
use std::collections::HashSet;

/// Downward raycast capability
pub trait GroundQuery: Send + Sync {
    /// Точка попадания луча из `origin` вниз не дальше `max_distance`
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Бесконечная плоскость на высоте `height`
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround {
    pub height: f32,
}

impl GroundQuery for FlatGround {
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        let drop = origin.y - self.height;
        (drop >= 0.0 && drop <= max_distance).then(|| Vec3::new(origin.x, self.height, origin.z))
    }
}

/// Плоская карта из квадратных тайлов (дыры = нет земли)
#[derive(Debug, Clone, Default)]
pub struct TileGround {
    pub tile_size: f32,
    pub height: f32,
    tiles: HashSet<IVec2>,
}

impl TileGround {
    pub fn new(tile_size: f32, height: f32) -> Self {
        Self {
            tile_size,
            height,
            tiles: HashSet::new(),
        }
    }

    /// Прямоугольная арена тайлов `[min, max]` включительно
    pub fn rectangle(tile_size: f32, height: f32, min: IVec2, max: IVec2) -> Self {
        let mut ground = Self::new(tile_size, height);
        for x in min.x..=max.x {
            for z in min.y..=max.y {
                ground.insert(IVec2::new(x, z));
            }
        }
        ground
    }

    pub fn insert(&mut self, tile: IVec2) {
        self.tiles.insert(tile);
    }

    pub fn remove(&mut self, tile: IVec2) {
        self.tiles.remove(&tile);
    }

    pub fn tile_at(&self, position: Vec3) -> IVec2 {
        IVec2::new(
            (position.x / self.tile_size).floor() as i32,
            (position.z / self.tile_size).floor() as i32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl GroundQuery for TileGround {
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        if !self.tiles.contains(&self.tile_at(origin)) {
            return None;
        }
        let drop = origin.y - self.height;
        (drop >= 0.0 && drop <= max_distance).then(|| Vec3::new(origin.x, self.height, origin.z))
    }
}

/// Resource: текущая земля симуляции
#[derive(Resource)]
pub struct Ground(pub Box<dyn GroundQuery>);

impl Default for Ground {
    fn default() -> Self {
        Self(Box::new(FlatGround::default()))
    }
}

impl Ground {
    pub fn new(query: impl GroundQuery + 'static) -> Self {
        Self(Box::new(query))
    }

    pub fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        self.0.raycast_down(origin, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ground_respects_max_distance() {
        let ground = FlatGround { height: 0.0 };

        assert_eq!(ground.raycast_down(Vec3::new(3.0, 1.5, 4.0), 2.0), Some(Vec3::new(3.0, 0.0, 4.0)));
        assert_eq!(ground.raycast_down(Vec3::new(3.0, 5.0, 4.0), 2.0), None);
        assert!(ground.raycast_down(Vec3::new(0.0, 10.0, 0.0), f32::INFINITY).is_some());
        // Под землёй луч вниз ничего не находит
        assert_eq!(ground.raycast_down(Vec3::new(0.0, -1.0, 0.0), 2.0), None);
    }

    #[test]
    fn test_tile_ground_holes() {
        let mut ground = TileGround::rectangle(1.0, 0.0, IVec2::new(-2, -2), IVec2::new(1, 1));
        ground.remove(IVec2::new(0, 0));

        assert!(ground.raycast_down(Vec3::new(-1.5, 0.5, -1.5), 2.0).is_some());
        assert!(ground.raycast_down(Vec3::new(0.5, 0.5, 0.5), 2.0).is_none(), "hole");
        assert!(ground.raycast_down(Vec3::new(5.0, 0.5, 5.0), 2.0).is_none(), "off map");
    }
}
