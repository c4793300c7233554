//! Error types для загрузки конфигов симуляции.

use thiserror::Error;

/// Ошибки чтения / парсинга / валидации `SimulationConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Файл не читается
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// RON не распарсился
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Значение вне допустимого диапазона
    #[error("Invalid config value '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
