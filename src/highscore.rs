//! High-score file: a single line `highscore N`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::engine::Score;
use crate::session::GameReport;

const TAG: &str = "highscore";

#[derive(thiserror::Error, Debug)]
pub enum HighScoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed high-score file: {0:?}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        HighScoreFile { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Load the baseline, creating the file with `highscore 0` on first run.
    pub fn initialize(&self) -> Result<Score, HighScoreError> {
        if !self.path.exists() {
            info!("high-score file {} not found, creating it", self.path.display());
            self.save(0)?;
            return Ok(0);
        }
        self.load()
    }

    pub fn load(&self) -> Result<Score, HighScoreError> {
        let text = fs::read_to_string(&self.path)?;
        let value = parse_highscore(&text)?;
        debug!("loaded high score {value} from {}", self.path.display());
        Ok(value)
    }

    pub fn save(&self, score: Score) -> Result<(), HighScoreError> {
        fs::write(&self.path, format!("{TAG} {score}"))?;
        Ok(())
    }

    /// Persist the report's new high score, if it has one. Returns whether
    /// anything was written.
    pub fn record(&self, report: &GameReport) -> Result<bool, HighScoreError> {
        match report.new_highscore {
            Some(score) => {
                self.save(score)?;
                info!("saved high score {score} to {}", self.path.display());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Accepts `highscore N` or a bare `N`; `N` must be a non-negative integer.
pub fn parse_highscore(text: &str) -> Result<Score, HighScoreError> {
    let mut parts = text.split_whitespace();
    let first = parts.next().ok_or_else(|| HighScoreError::Malformed(text.to_string()))?;
    let number = if first == TAG { parts.next() } else { Some(first) };
    let value = number
        .filter(|_| parts.next().is_none())
        .and_then(|n| n.parse::<Score>().ok())
        .filter(|&v| v >= 0)
        .ok_or_else(|| HighScoreError::Malformed(text.to_string()))?;
    Ok(value)
}
