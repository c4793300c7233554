//! Headless steering: NavAgent → Transform по прямой
//!
//! Navmesh здесь нет. Агент идёт к destination в плоскости XZ,
//! поворачивается по направлению движения, пишет velocity и walking флаг.

use bevy::prelude::*;

use crate::components::{AnimationIntent, NavAgent};

/// System: движение NavAgent к destination
pub fn steer_nav_agents(
    time: Res<Time<Fixed>>,
    mut agents: Query<(&mut NavAgent, &mut Transform, Option<&mut AnimationIntent>)>,
) {
    let delta = time.delta_secs();

    for (mut nav, mut transform, animation) in agents.iter_mut() {
        let mut velocity = Vec3::ZERO;

        if let (true, false, Some(destination)) = (nav.is_active(), nav.is_stopped(), nav.destination) {
            let mut offset = destination - transform.translation;
            offset.y = 0.0;
            let distance = offset.length();

            if distance > nav.stopping_distance {
                let direction = offset / distance;
                let step = (nav.speed * delta).min(distance);
                transform.translation += direction * step;
                transform.look_to(direction, Vec3::Y);
                velocity = direction * nav.speed;
            }
        }

        nav.velocity = velocity;

        if let Some(mut animation) = animation {
            animation.walking = !animation.dead && velocity.length() > 0.1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_headless_app, run_fixed_ticks, SimulationPlugin};

    fn steering_app() -> App {
        let mut app = create_headless_app(3);
        app.add_plugins(SimulationPlugin::default());
        app
    }

    #[test]
    fn test_agent_walks_to_destination_and_stops() {
        let mut app = steering_app();
        let mut nav = NavAgent::new(3.0);
        nav.set_destination(Vec3::new(1.0, 0.0, 0.0));
        let agent = app
            .world_mut()
            .spawn((nav, Transform::default(), AnimationIntent::default()))
            .id();

        run_fixed_ticks(&mut app, 10);
        let x = app.world().get::<Transform>(agent).unwrap().translation.x;
        assert!((x - 0.5).abs() < 1e-3, "3 m/s for 10 ticks, got {}", x);
        assert!(app.world().get::<AnimationIntent>(agent).unwrap().walking);

        run_fixed_ticks(&mut app, 30);
        let transform = app.world().get::<Transform>(agent).unwrap();
        assert!((transform.translation.x - 1.0).abs() <= 0.1);
        assert_eq!(app.world().get::<NavAgent>(agent).unwrap().velocity, Vec3::ZERO);
        assert!(!app.world().get::<AnimationIntent>(agent).unwrap().walking);
    }

    #[test]
    fn test_stopped_agent_does_not_move() {
        let mut app = steering_app();
        let mut nav = NavAgent::default();
        nav.set_destination(Vec3::new(0.0, 0.0, 5.0));
        nav.stop();
        let agent = app.world_mut().spawn((nav, Transform::default())).id();

        run_fixed_ticks(&mut app, 20);

        assert_eq!(app.world().get::<Transform>(agent).unwrap().translation, Vec3::ZERO);
    }
}
