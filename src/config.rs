use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Game configuration. Every key is optional.
///
/// ```toml
/// seed = 42
///
/// [spawn]
/// four_probability = 0.2
///
/// [highscore]
/// enabled = true
/// path = "highscore"
///
/// [debug]
/// enabled = true
/// code = "debug"
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    /// Fixed RNG seed for reproducible games. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub spawn: Spawn,
    #[serde(default)]
    pub highscore: HighScore,
    #[serde(default)]
    pub debug: Console,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Spawn {
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct HighScore {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
    #[serde(default = "defaults::highscore_path")]
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Console {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
    /// Code the console asks for before allowing edits.
    #[serde(default = "defaults::debug_code")]
    pub code: String,
}

impl Default for Spawn {
    fn default() -> Self { Self { four_probability: defaults::four_probability() } }
}

impl Default for HighScore {
    fn default() -> Self { Self { enabled: defaults::enabled(), path: defaults::highscore_path() } }
}

impl Default for Console {
    fn default() -> Self { Self { enabled: defaults::enabled(), code: defaults::debug_code() } }
}

impl Spawn {
    /// Resolve the 4-tile probability to [0, 1], falling back to 0.2.
    pub fn four_probability_or_default(&self) -> f64 {
        match self.four_probability {
            p if p.is_finite() && (0.0..=1.0).contains(&p) => p,
            _ => defaults::four_probability(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn four_probability() -> f64 { crate::engine::FOUR_PROBABILITY }
    pub fn enabled() -> bool { true }
    pub fn highscore_path() -> PathBuf { PathBuf::from("highscore") }
    pub fn debug_code() -> String { String::from("debug") }
}
