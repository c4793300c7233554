//! Tests for projectile flight.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::{DamageDealt, Projectile};
    use crate::components::{Collider, CollisionLayer, Enemy, Health};
    use crate::{create_headless_app, run_fixed_ticks, run_fixed_ticks_collecting, spawn_player, SimulationPlugin};

    fn combat_app() -> App {
        let mut app = create_headless_app(5);
        app.add_plugins(SimulationPlugin::default());
        app
    }

    fn spawn_projectile(app: &mut App, origin: Vec3, direction: Vec3, speed: f32, max_range: f32) -> Entity {
        app.world_mut()
            .spawn((
                Projectile::new(
                    Entity::PLACEHOLDER,
                    CollisionLayer::ENEMY.0,
                    direction,
                    speed,
                    10.0,
                    max_range,
                ),
                Transform::from_translation(origin),
            ))
            .id()
    }

    fn projectile_count(app: &mut App) -> usize {
        let mut query = app.world_mut().query::<&Projectile>();
        query.iter(app.world()).count()
    }

    #[test]
    fn test_projectile_hits_player_once() {
        let mut app = combat_app();
        let player = spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
        spawn_projectile(&mut app, Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 20.0, 50.0);

        let hits = run_fixed_ticks_collecting::<DamageDealt>(&mut app, 30);

        assert_eq!(app.world().get::<Health>(player).unwrap().current, 90.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(projectile_count(&mut app), 0, "projectile despawned on hit");
    }

    #[test]
    fn test_projectile_passes_through_shooter_category() {
        let mut app = combat_app();
        let ally = app
            .world_mut()
            .spawn((
                Enemy::default(),
                Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)),
                Health::new(50.0),
                CollisionLayer::ENEMY,
                Collider::default(),
            ))
            .id();
        let player = spawn_player(app.world_mut(), Vec3::ZERO, 100.0);
        spawn_projectile(&mut app, Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 20.0, 50.0);

        run_fixed_ticks(&mut app, 30);

        assert_eq!(app.world().get::<Health>(ally).unwrap().current, 50.0);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 90.0);
    }

    #[test]
    fn test_projectile_expires_at_max_range() {
        let mut app = combat_app();
        let projectile = spawn_projectile(&mut app, Vec3::ZERO, Vec3::X, 20.0, 3.0);

        run_fixed_ticks(&mut app, 8);
        assert!(app.world().get_entity(projectile).is_ok(), "2.67m of 3m traveled");

        run_fixed_ticks(&mut app, 2);
        assert!(app.world().get_entity(projectile).is_err());
    }

    #[test]
    fn test_projectile_expires_after_lifespan() {
        let mut app = combat_app();
        spawn_projectile(&mut app, Vec3::ZERO, Vec3::X, 0.5, 100.0);

        run_fixed_ticks(&mut app, 290);
        assert_eq!(projectile_count(&mut app), 1);

        run_fixed_ticks(&mut app, 20);
        assert_eq!(projectile_count(&mut app), 0);
    }

    #[test]
    fn test_projectile_stops_at_range_before_target() {
        let mut app = combat_app();
        let player = spawn_player(app.world_mut(), Vec3::new(0.0, 0.0, 10.0), 100.0);
        spawn_projectile(&mut app, Vec3::ZERO, Vec3::Z, 20.0, 5.0);

        run_fixed_ticks(&mut app, 60);

        assert_eq!(app.world().get::<Health>(player).unwrap().current, 100.0);
    }
}
