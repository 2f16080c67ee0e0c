//! User configuration, read from an optional TOML file.

use crate::models::engine::constants::{
    DEFAULT_HIT_TOLERANCE_BEATS, DEFAULT_MISS_GRACE_BEATS, DEFAULT_SCROLL_SPEED,
    DEFAULT_TICKS_PER_SECOND, HEALTH_MAX, HIT_SCORE, LOOKAHEAD_SCALE, MISS_PENALTY,
};
use crate::models::engine::{Direction, HitWindow};
use crate::models::error::ConfigError;
use crate::models::progress::ScoreRules;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeSettings {
    pub hit_tolerance_beats: f64,
    pub miss_grace_beats: f64,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            hit_tolerance_beats: DEFAULT_HIT_TOLERANCE_BEATS,
            miss_grace_beats: DEFAULT_MISS_GRACE_BEATS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub hit_score: u32,
    pub health_max: u32,
    pub miss_penalty: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            hit_score: HIT_SCORE,
            health_max: HEALTH_MAX,
            miss_penalty: MISS_PENALTY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Higher is faster; notes appear `4 / scroll_speed` beats ahead.
    pub scroll_speed: f64,
    /// Overrides the chart's calibration offset when set.
    pub calibration_offset_beats: Option<f64>,
    pub ticks_per_second: u32,
    pub volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            scroll_speed: DEFAULT_SCROLL_SPEED,
            calibration_offset_beats: None,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub screen_width: u32,
    pub screen_height: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            screen_width: 160,
            screen_height: 144,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub judge: JudgeSettings,
    pub scoring: ScoringSettings,
    pub playback: PlaybackSettings,
    pub display: DisplaySettings,
    /// Direction name ("left", "down", ...) to key labels.
    pub keybinds: HashMap<String, Vec<String>>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            judge: JudgeSettings::default(),
            scoring: ScoringSettings::default(),
            playback: PlaybackSettings::default(),
            display: DisplaySettings::default(),
            keybinds: default_keybinds(),
        }
    }
}

fn default_keybinds() -> HashMap<String, Vec<String>> {
    [
        ("left", ["ArrowLeft", "KeyA"]),
        ("down", ["ArrowDown", "KeyS"]),
        ("up", ["ArrowUp", "KeyW"]),
        ("right", ["ArrowRight", "KeyD"]),
    ]
    .into_iter()
    .map(|(dir, keys)| {
        (
            dir.to_string(),
            keys.iter().map(|k| k.to_string()).collect(),
        )
    })
    .collect()
}

impl GameSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: GameSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).inspect_err(|e| {
            log::error!("CONFIG: Failed to load {:?}: {}", path, e);
        })
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!("CONFIG: {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let playback = &self.playback;
        if !(playback.scroll_speed.is_finite() && playback.scroll_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "playback.scroll_speed must be positive, got {}",
                playback.scroll_speed
            )));
        }
        if playback.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "playback.ticks_per_second must be positive".to_string(),
            ));
        }
        if playback
            .calibration_offset_beats
            .is_some_and(|offset| !offset.is_finite())
        {
            return Err(ConfigError::Invalid(
                "playback.calibration_offset_beats must be finite".to_string(),
            ));
        }
        let judge = &self.judge;
        for (name, value) in [
            ("judge.hit_tolerance_beats", judge.hit_tolerance_beats),
            ("judge.miss_grace_beats", judge.miss_grace_beats),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.scoring.health_max == 0 {
            return Err(ConfigError::Invalid(
                "scoring.health_max must be positive".to_string(),
            ));
        }
        if self.display.screen_width == 0 || self.display.screen_height == 0 {
            return Err(ConfigError::Invalid(
                "display size must be positive".to_string(),
            ));
        }
        for dir in self.keybinds.keys() {
            if Direction::from_name(dir).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "keybinds: unknown direction {dir:?}"
                )));
            }
        }
        Ok(())
    }

    /// Beats of lookahead before a note's onset at which it becomes active.
    pub fn lookahead_beats(&self) -> f64 {
        LOOKAHEAD_SCALE / self.playback.scroll_speed
    }

    pub fn hit_window(&self) -> HitWindow {
        HitWindow::from_custom(self.judge.hit_tolerance_beats, self.judge.miss_grace_beats)
    }

    pub fn score_rules(&self) -> ScoreRules {
        ScoreRules {
            hit_score: self.scoring.hit_score,
            health_max: self.scoring.health_max,
            miss_penalty: self.scoring.miss_penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_constants() {
        let settings = GameSettings::default();
        assert_eq!(settings.lookahead_beats(), 2.0);
        assert_eq!(settings.hit_window(), HitWindow::new());
        assert_eq!(settings.score_rules(), ScoreRules::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let settings = GameSettings::from_toml(
            r#"
            [judge]
            hit_tolerance_beats = 0.25

            [playback]
            scroll_speed = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.judge.hit_tolerance_beats, 0.25);
        assert_eq!(settings.judge.miss_grace_beats, DEFAULT_MISS_GRACE_BEATS);
        assert_eq!(settings.lookahead_beats(), 1.0);
        assert_eq!(settings.keybinds["left"], vec!["ArrowLeft", "KeyA"]);
    }

    #[test]
    fn rejects_zero_speed() {
        let err = GameSettings::from_toml("[playback]\nscroll_speed = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keybind_direction() {
        let err = GameSettings::from_toml("[keybinds]\nmiddle = [\"Space\"]\n").unwrap_err();
        assert!(err.to_string().contains("middle"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = GameSettings::from_toml("[judge\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GameSettings::load_or_default(&dir.path().join("none.toml")).unwrap();
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beatline.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[scoring]\nhit_score = 10").unwrap();

        let settings = GameSettings::load(&path).unwrap();
        assert_eq!(settings.scoring.hit_score, 10);
    }
}
