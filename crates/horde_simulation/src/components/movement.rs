//! Movement capability: NavAgent
//!
//! Абстракция "двигай меня к точке P". В headless режиме агент ведёт
//! `steer_nav_agents` по прямой; движок с navmesh может подменить систему,
//! сохранив компонент.

use bevy::prelude::*;

/// Navigation агент врага
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    /// Скорость движения (м/с)
    pub speed: f32,
    /// Дистанция, на которой считаем цель достигнутой
    pub stopping_distance: f32,
    /// Текущая скорость (пишет steering система)
    pub velocity: Vec3,
    stopped: bool,
    active: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self::new(3.5)
    }
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            speed,
            stopping_distance: 0.1,
            velocity: Vec3::ZERO,
            stopped: false,
            active: true,
        }
    }

    /// Агент подключён к навигации (не отключён смертью)
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    /// Мгновенная телепортация, текущий путь сбрасывается
    pub fn warp(&mut self, transform: &mut Transform, position: Vec3) {
        transform.translation = position;
        self.destination = None;
        self.velocity = Vec3::ZERO;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.velocity = Vec3::ZERO;
    }

    pub fn resume(&mut self) {
        self.stopped = false;
    }

    /// Отключение навигации (смерть)
    pub fn disable(&mut self) {
        self.active = false;
        self.stop();
        self.destination = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warp_drops_current_path() {
        let mut nav = NavAgent::new(3.0);
        let mut transform = Transform::default();
        nav.set_destination(Vec3::new(10.0, 0.0, 0.0));

        nav.warp(&mut transform, Vec3::new(-4.0, 0.0, 2.0));

        assert_eq!(transform.translation, Vec3::new(-4.0, 0.0, 2.0));
        assert!(nav.destination.is_none());
    }

    #[test]
    fn test_stop_and_resume_keep_destination() {
        let mut nav = NavAgent::default();
        nav.set_destination(Vec3::X);

        nav.stop();
        assert!(nav.is_stopped());
        assert_eq!(nav.destination, Some(Vec3::X));

        nav.resume();
        assert!(!nav.is_stopped());
    }

    #[test]
    fn test_disable_is_permanent() {
        let mut nav = NavAgent::default();
        nav.set_destination(Vec3::X);

        nav.disable();
        nav.resume();

        assert!(!nav.is_active());
        assert!(nav.destination.is_none());
    }
}
