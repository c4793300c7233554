//! Конфиг симуляции (RON)
//!
//! SimulationConfig = seed + difficulty + параметры spawner'а + список archetype'ов врагов.
//! Defaults совпадают с игровой настройкой; bundled `assets/simulation.ron` их повторяет.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::ai::AIConfig;
use crate::combat::{AttackStrategy, MeleeStrike, PelletPattern, RangedVolley};
use crate::mission::Difficulty;
use crate::spatial::RejectionSampler;

mod error;

pub use error::ConfigError;

/// Bundled конфиг (используется headless бинарником по умолчанию)
pub const BUNDLED_CONFIG: &str = include_str!("../../assets/simulation.ron");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub population: PopulationConfig,
    pub archetypes: Vec<EnemyArchetype>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::Normal,
            population: PopulationConfig::default(),
            archetypes: vec![
                EnemyArchetype::grunt(),
                EnemyArchetype::rifleman(),
                EnemyArchetype::shotgunner(),
            ],
        }
    }
}

/// Параметры PopulationController
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub target_max: usize,
    pub spawn_range: f32,
    pub min_spawn_distance: f32,
    /// (min, max) секунд между группами
    pub spawn_interval: (f32, f32),
    pub group_size_max: usize,
    pub spawn_start_delay: f32,
    pub capacity_backoff: f32,
    pub group_jitter: f32,
    /// Размер стартовой волны (режется по свободной ёмкости)
    pub initial_enemies: usize,
    pub sampler: RejectionSampler,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            target_max: 10,
            spawn_range: 20.0,
            min_spawn_distance: 5.0,
            spawn_interval: (2.0, 5.0),
            group_size_max: 3,
            spawn_start_delay: 10.0,
            capacity_backoff: 5.0,
            group_jitter: 2.0,
            initial_enemies: 20,
            sampler: RejectionSampler::default(),
        }
    }
}

/// Тип врага: AI параметры + стратегия атаки + анимации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub ai: AIConfig,
    pub strategy: AttackStrategy,
    pub attack_animation_length: f32,
    pub death_animation_length: f32,
    pub move_speed: f32,
}

impl EnemyArchetype {
    /// Melee grunt: бежит вплотную, бьёт в радиусе 2м
    pub fn grunt() -> Self {
        Self {
            name: "grunt".to_string(),
            ai: AIConfig::default(),
            strategy: AttackStrategy::Melee(MeleeStrike { range: 2.0, ..Default::default() }),
            attack_animation_length: 2.0,
            death_animation_length: 1.5,
            move_speed: 3.5,
        }
    }

    /// Ranged rifleman: одиночные выстрелы издалека
    pub fn rifleman() -> Self {
        Self {
            name: "rifleman".to_string(),
            ai: AIConfig {
                sight_range: 20.0,
                attack_range: 12.0,
                time_between_attacks: 1.5,
                is_melee: false,
                ..Default::default()
            },
            strategy: AttackStrategy::Ranged(RangedVolley {
                spread_amount: 0.15,
                ..Default::default()
            }),
            attack_animation_length: 1.2,
            death_animation_length: 1.5,
            move_speed: 3.0,
        }
    }

    /// Shotgunner: веер из трёх дробин на средней дистанции
    pub fn shotgunner() -> Self {
        Self {
            name: "shotgunner".to_string(),
            ai: AIConfig {
                sight_range: 18.0,
                attack_range: 7.0,
                time_between_attacks: 2.0,
                is_melee: false,
                ..Default::default()
            },
            strategy: AttackStrategy::Ranged(RangedVolley {
                spread_amount: 0.1,
                max_range: 25.0,
                pattern: PelletPattern::Spread { angle_degrees: 15.0 },
                ..Default::default()
            }),
            attack_animation_length: 1.4,
            death_animation_length: 1.5,
            move_speed: 3.2,
        }
    }
}

impl SimulationConfig {
    /// Парсинг + валидация
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_ron_str(BUNDLED_CONFIG)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let population = &self.population;

        require_finite(
            "population",
            &[
                population.spawn_range,
                population.min_spawn_distance,
                population.spawn_interval.0,
                population.spawn_interval.1,
                population.spawn_start_delay,
                population.capacity_backoff,
                population.group_jitter,
                population.sampler.relax_factor,
            ],
        )?;

        if population.target_max == 0 {
            return Err(ConfigError::invalid("population.target_max", "must be at least 1"));
        }
        if population.group_size_max == 0 {
            return Err(ConfigError::invalid("population.group_size_max", "must be at least 1"));
        }
        let (min_interval, max_interval) = population.spawn_interval;
        if min_interval < 0.0 || max_interval < min_interval {
            return Err(ConfigError::invalid(
                "population.spawn_interval",
                format!("expected 0 <= min <= max, got ({}, {})", min_interval, max_interval),
            ));
        }
        if population.spawn_range <= 0.0 {
            return Err(ConfigError::invalid("population.spawn_range", "must be positive"));
        }
        if population.min_spawn_distance < 0.0 || population.min_spawn_distance >= population.spawn_range {
            return Err(ConfigError::invalid(
                "population.min_spawn_distance",
                "must be in [0, spawn_range)",
            ));
        }
        if population.spawn_start_delay < 0.0 || population.capacity_backoff < 0.0 || population.group_jitter < 0.0 {
            return Err(ConfigError::invalid(
                "population",
                "spawn_start_delay, capacity_backoff and group_jitter must not be negative",
            ));
        }
        if population.sampler.attempts_per_round == 0 || population.sampler.rounds == 0 {
            return Err(ConfigError::invalid("population.sampler", "needs at least one attempt"));
        }
        if population.sampler.relax_factor <= 0.0 || population.sampler.relax_factor > 1.0 {
            return Err(ConfigError::invalid("population.sampler.relax_factor", "must be in (0, 1]"));
        }

        if self.archetypes.is_empty() {
            return Err(ConfigError::invalid("archetypes", "at least one enemy archetype is required"));
        }
        for archetype in &self.archetypes {
            archetype.validate()?;
        }

        Ok(())
    }
}

impl EnemyArchetype {
    fn validate(&self) -> Result<(), ConfigError> {
        let field = |name: &str| format!("archetypes[{}].{}", self.name, name);
        let ai = &self.ai;

        require_finite(
            field("ai"),
            &[
                ai.sight_range,
                ai.attack_range,
                ai.min_distance_to_player,
                ai.time_between_attacks,
                ai.patrol_area_range,
                ai.required_time_in_range,
                ai.random_offset_range,
                ai.offset_refresh_rate,
                ai.wait_time_at_point,
                ai.drop_chance,
                ai.health_drop_chance,
            ],
        )?;
        require_finite(
            field("animation"),
            &[self.attack_animation_length, self.death_animation_length, self.move_speed],
        )?;
        match &self.strategy {
            AttackStrategy::Melee(strike) => {
                require_finite(field("strategy"), &[strike.range])?;
                if strike.range <= 0.0 {
                    return Err(ConfigError::invalid(field("strategy.range"), "must be positive"));
                }
            }
            AttackStrategy::Ranged(volley) => {
                let angle = match volley.pattern {
                    PelletPattern::Single => 0.0,
                    PelletPattern::Spread { angle_degrees } => angle_degrees,
                };
                require_finite(
                    field("strategy"),
                    &[volley.projectile_speed, volley.max_range, volley.spread_amount, angle],
                )?;
                if volley.projectile_speed <= 0.0 || volley.max_range <= 0.0 {
                    return Err(ConfigError::invalid(
                        field("strategy"),
                        "projectile_speed and max_range must be positive",
                    ));
                }
            }
        }

        if ai.time_between_attacks < 0.0 || ai.offset_refresh_rate < 0.0 || ai.wait_time_at_point < 0.0 {
            return Err(ConfigError::invalid(field("ai"), "timers must not be negative"));
        }
        if self.ai.is_melee != self.strategy.is_melee() {
            return Err(ConfigError::invalid(field("ai.is_melee"), "must match the attack strategy"));
        }
        if self.ai.attack_range <= 0.0 || self.ai.sight_range < self.ai.attack_range {
            return Err(ConfigError::invalid(field("ai.attack_range"), "expected 0 < attack_range <= sight_range"));
        }
        if self.attack_animation_length <= 0.0 || self.death_animation_length < 0.0 {
            return Err(ConfigError::invalid(field("animation"), "clip lengths must be positive"));
        }
        if self.move_speed <= 0.0 {
            return Err(ConfigError::invalid(field("move_speed"), "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.ai.drop_chance) || !(0.0..=1.0).contains(&self.ai.health_drop_chance) {
            return Err(ConfigError::invalid(field("ai.drop_chance"), "chances must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Все значения конечны (без NaN и inf)
fn require_finite(field: impl Into<String>, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_parses() {
        let config = SimulationConfig::bundled().expect("bundled config is valid");

        assert_eq!(config.population.target_max, 10);
        assert_eq!(config.population.initial_enemies, 20);
        assert_eq!(config.difficulty, Difficulty::Normal);
        assert_eq!(config.archetypes.len(), 3);
        assert!(config.archetypes[0].strategy.is_melee());
        assert!(matches!(
            &config.archetypes[2].strategy,
            AttackStrategy::Ranged(RangedVolley { pattern: PelletPattern::Spread { .. }, .. })
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = SimulationConfig::from_ron_str("(seed: 7, difficulty: Hard)").unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.population.spawn_range, 20.0);
        assert_eq!(config.archetypes.len(), 3);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = SimulationConfig::from_ron_str("(seed: \"not a number\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        let mut config = SimulationConfig::default();
        config.population.spawn_interval = (5.0, 2.0);

        let error = config.validate().unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { ref field, .. } if field == "population.spawn_interval"));
    }

    #[test]
    fn test_melee_flag_must_match_strategy() {
        let mut config = SimulationConfig::default();
        config.archetypes[1].ai.is_melee = true;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut config = SimulationConfig::default();
        config.population.spawn_interval = (f32::NAN, 4.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "population"
        ));

        let mut config = SimulationConfig::default();
        config.archetypes[0].ai.random_offset_range = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "archetypes[grunt].ai"
        ));

        let mut config = SimulationConfig::default();
        if let AttackStrategy::Ranged(volley) = &mut config.archetypes[1].strategy {
            volley.spread_amount = f32::INFINITY;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "archetypes[rifleman].strategy"
        ));
    }

    #[test]
    fn test_negative_jitter_is_rejected() {
        let mut config = SimulationConfig::default();
        config.population.group_jitter = -1.0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::load("does/not/exist.ron");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
