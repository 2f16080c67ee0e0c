//! Chart loading and structural validation.
//!
//! A chart is read once, validated as a whole and then never mutated. It is
//! shared read-only (behind an `Arc`) by the transport clock's consumer and
//! the note scheduler.

use super::constants::{DEFAULT_NOTE_OFFSET_BEATS, END_PADDING_BEATS, NUM_DIRECTIONS};
use super::note::{Direction, Note};
use crate::models::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk chart layout (JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub title: String,
    /// Audio file name, relative to the chart's directory.
    #[serde(default)]
    pub filename: String,
    pub bpm: i64,
    /// Song length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Calibration offset in beats; defaults to the latency constant.
    #[serde(default)]
    pub offset: Option<f64>,
    pub notes: Vec<Note>,
}

/// Immutable, validated song description.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    title: String,
    audio_filename: String,
    bpm: u32,
    duration_seconds: Option<f64>,
    offset_beats: f64,
    notes: Vec<Note>,
}

impl Chart {
    /// Builds a chart from a bpm and a note list, with default metadata.
    pub fn new(bpm: i64, notes: Vec<Note>) -> Result<Self, ChartError> {
        Self::from_data(ChartData {
            bpm,
            notes,
            ..ChartData::default()
        })
    }

    /// Validates raw chart data. Fails on the first malformed field.
    pub fn from_data(data: ChartData) -> Result<Self, ChartError> {
        let bpm = u32::try_from(data.bpm)
            .ok()
            .filter(|bpm| *bpm > 0)
            .ok_or(ChartError::InvalidBpm { bpm: data.bpm })?;

        for (index, note) in data.notes.iter().enumerate() {
            if !note.onset_beat.is_finite() {
                return Err(ChartError::NonFiniteOnset { index });
            }
            if note.onset_beat < 0.0 {
                return Err(ChartError::NegativeOnset {
                    index,
                    onset: note.onset_beat,
                });
            }
        }

        if let Some(duration) = data.duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ChartError::InvalidDuration { duration });
            }
        }

        let offset_beats = data.offset.unwrap_or(DEFAULT_NOTE_OFFSET_BEATS);
        if !offset_beats.is_finite() {
            return Err(ChartError::NonFiniteOffset);
        }

        let chart = Self {
            title: data.title,
            audio_filename: data.filename,
            bpm,
            duration_seconds: data.duration,
            offset_beats,
            notes: data.notes,
        };

        if !chart.is_sorted() {
            log::warn!(
                "CHART: Notes of {:?} are not in onset order; late entries wait behind earlier ones",
                chart.title
            );
        }

        Ok(chart)
    }

    /// Parses and validates a JSON chart.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let data: ChartData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Loads a chart from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ChartError> {
        let content = fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let chart = Self::from_json(&content)?;
        log::info!(
            "CHART: Loaded {:?} ({} bpm, {} notes)",
            chart.title,
            chart.bpm,
            chart.notes.len()
        );
        Ok(chart)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn audio_filename(&self) -> &str {
        &self.audio_filename
    }

    /// Resolves the audio file next to the chart file.
    pub fn audio_path(&self, chart_path: &Path) -> Option<PathBuf> {
        if self.audio_filename.is_empty() {
            return None;
        }
        let parent = chart_path.parent().unwrap_or_else(|| Path::new(""));
        Some(parent.join(&self.audio_filename))
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn beats_per_second(&self) -> f64 {
        self.bpm as f64 / 60.0
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn offset_beats(&self) -> f64 {
        self.offset_beats
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn last_onset(&self) -> Option<f64> {
        self.notes.iter().map(|n| n.onset_beat).reduce(f64::max)
    }

    /// Number of notes per lane.
    pub fn direction_counts(&self) -> [usize; NUM_DIRECTIONS] {
        let mut counts = [0; NUM_DIRECTIONS];
        for note in &self.notes {
            counts[note.direction.lane()] += 1;
        }
        counts
    }

    pub fn count_for(&self, direction: Direction) -> usize {
        self.direction_counts()[direction.lane()]
    }

    pub fn is_sorted(&self) -> bool {
        self.notes
            .windows(2)
            .all(|w| w[0].onset_beat <= w[1].onset_beat)
    }

    /// Playback time (seconds) at which the round is over.
    ///
    /// Uses the declared duration when present; otherwise the last note's
    /// expiry plus a short padding.
    pub fn end_seconds(&self, miss_grace_beats: f64) -> f64 {
        if let Some(duration) = self.duration_seconds {
            return duration;
        }
        let last = self.last_onset().unwrap_or(0.0);
        let end_beat = last + miss_grace_beats + END_PADDING_BEATS;
        ((end_beat - self.offset_beats) / self.beats_per_second()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "title": "Sample",
        "filename": "sample.ogg",
        "bpm": 120,
        "duration": 30.5,
        "notes": [
            {"direction": "left", "onset": 1.0},
            {"direction": "down", "onset": 1.5},
            {"direction": "right", "onset": 2.25}
        ]
    }"#;

    #[test]
    fn parses_json_chart() {
        let chart = Chart::from_json(SAMPLE).unwrap();
        assert_eq!(chart.title(), "Sample");
        assert_eq!(chart.bpm(), 120);
        assert_eq!(chart.len(), 3);
        assert_eq!(chart.duration_seconds(), Some(30.5));
        assert_eq!(chart.offset_beats(), DEFAULT_NOTE_OFFSET_BEATS);
        assert_eq!(chart.note(2).unwrap().onset_beat, 2.25);
        assert_eq!(chart.direction_counts(), [1, 1, 0, 1]);
    }

    #[test]
    fn keeps_note_order_and_fractional_onsets() {
        let chart = Chart::from_json(
            r#"{"bpm": 90, "notes": [
                {"direction": "up", "onset": 4.125},
                {"direction": "left", "onset": 0.333}
            ]}"#,
        )
        .unwrap();
        assert_eq!(chart.notes()[0].onset_beat, 4.125);
        assert_eq!(chart.notes()[1].onset_beat, 0.333);
        assert!(!chart.is_sorted());
    }

    #[test]
    fn rejects_non_positive_bpm() {
        let err = Chart::new(0, vec![]).unwrap_err();
        assert!(matches!(err, ChartError::InvalidBpm { bpm: 0 }));
        assert!(err.to_string().contains("bpm"));

        let err = Chart::new(-120, vec![]).unwrap_err();
        assert!(matches!(err, ChartError::InvalidBpm { bpm: -120 }));
    }

    #[test]
    fn rejects_negative_onset_with_index() {
        let notes = vec![
            Note::new(Direction::Left, 1.0),
            Note::new(Direction::Up, -0.5),
        ];
        let err = Chart::new(60, notes).unwrap_err();
        assert!(matches!(err, ChartError::NegativeOnset { index: 1, .. }));
        assert!(err.to_string().contains("notes[1].onset"));
    }

    #[test]
    fn rejects_negative_duration() {
        let err = Chart::from_json(r#"{"bpm": 60, "duration": -3.0, "notes": []}"#).unwrap_err();
        assert!(matches!(err, ChartError::InvalidDuration { .. }));
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = Chart::from_json(r#"{"bpm": 60, "notes": [{"direction": "middle", "onset": 1}]}"#)
            .unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
    }

    #[test]
    fn end_time_without_duration_pads_last_note() {
        let chart = Chart::from_data(ChartData {
            bpm: 60,
            offset: Some(0.0),
            notes: vec![Note::new(Direction::Left, 4.0)],
            ..ChartData::default()
        })
        .unwrap();
        // 4 + 1 grace + 2 padding beats at one beat per second
        assert_eq!(chart.end_seconds(1.0), 7.0);
    }

    #[test]
    fn loads_from_file_and_resolves_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let chart = Chart::load(&path).unwrap();
        assert_eq!(chart.audio_path(&path), Some(dir.path().join("sample.ogg")));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Chart::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ChartError::Io { .. }));
    }
}
