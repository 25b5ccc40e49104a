//! Emotion analysis: timeline points, aggregates, and chart densification.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The channels every chart row carries, whether or not the analyzer
/// reported them.
pub const EMOTION_CHANNELS: [&str; 6] = ["happy", "sad", "angry", "calm", "excited", "neutral"];

/// One analyzed moment: an emotion label with its intensity at a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPoint {
    pub timestamp: f64,
    pub label: String,
    pub intensity: f64,
}

impl EmotionPoint {
    pub fn new(timestamp: f64, label: impl Into<String>, intensity: f64) -> Self {
        Self {
            timestamp,
            label: label.into(),
            intensity,
        }
    }
}

/// An aggregate emotion weight for the good-side/bad-side summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEmotion {
    pub label: String,
    pub score: f64,
}

impl WeightedEmotion {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Whether an analysis came from the backend or from the built-in
/// illustrative dataset used when the backend is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataProvenance {
    Live,
    Demo,
}

/// The raw analysis payload as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionReading {
    pub points: Vec<EmotionPoint>,
    #[serde(default)]
    pub good_side: Vec<WeightedEmotion>,
    #[serde(default)]
    pub bad_side: Vec<WeightedEmotion>,
}

/// A completed emotion analysis, labeled with where the data came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    pub points: Vec<EmotionPoint>,
    pub good_side: Vec<WeightedEmotion>,
    pub bad_side: Vec<WeightedEmotion>,
    pub provenance: DataProvenance,
}

impl EmotionAnalysis {
    pub fn live(reading: EmotionReading) -> Self {
        Self {
            points: reading.points,
            good_side: reading.good_side,
            bad_side: reading.bad_side,
            provenance: DataProvenance::Live,
        }
    }

    /// The fixed illustrative dataset shown when the analyzer cannot be
    /// reached, so the emotion section always has something to draw.
    pub fn demo() -> Self {
        let points = vec![
            EmotionPoint::new(0.0, "neutral", 0.4),
            EmotionPoint::new(2.0, "happy", 0.3),
            EmotionPoint::new(4.0, "calm", 0.6),
            EmotionPoint::new(6.0, "excited", 0.8),
            EmotionPoint::new(8.0, "happy", 0.7),
            EmotionPoint::new(10.0, "calm", 0.5),
            EmotionPoint::new(12.0, "excited", 0.9),
            EmotionPoint::new(14.0, "happy", 0.6),
            EmotionPoint::new(16.0, "neutral", 0.3),
            EmotionPoint::new(18.0, "calm", 0.4),
        ];
        let good_side = vec![
            WeightedEmotion::new("happy", 0.7),
            WeightedEmotion::new("calm", 0.5),
            WeightedEmotion::new("excited", 0.8),
        ];
        let bad_side = vec![
            WeightedEmotion::new("sad", 0.6),
            WeightedEmotion::new("angry", 0.4),
            WeightedEmotion::new("frustrated", 0.3),
        ];
        Self {
            points,
            good_side,
            bad_side,
            provenance: DataProvenance::Demo,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.provenance == DataProvenance::Demo
    }

    /// Chart rows for this analysis, densified for smooth lines.
    pub fn chart_series(&self) -> Vec<EmotionSample> {
        densify_chart_series(&self.points)
    }
}

/// One chart row: every channel's level at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionSample {
    pub time: f64,
    pub levels: BTreeMap<String, f64>,
}

impl EmotionSample {
    /// A channel's level at this row, zero when absent.
    pub fn level(&self, channel: &str) -> f64 {
        self.levels.get(channel).copied().unwrap_or(0.0)
    }
}

/// Turns sparse analyzer points into a chart-ready series.
///
/// Points are bucketed on timestamps rounded to 0.1s, every bucket carries
/// the six fixed channels (zeroed when silent) plus any extra labels the
/// analyzer emitted, and each gap wider than two seconds gets a single
/// synthetic midpoint averaging its neighbors so lines do not jump.
pub fn densify_chart_series(points: &[EmotionPoint]) -> Vec<EmotionSample> {
    let mut by_time: BTreeMap<i64, BTreeMap<String, f64>> = BTreeMap::new();
    for point in points {
        let key = (point.timestamp * 10.0).round() as i64;
        let levels = by_time.entry(key).or_insert_with(|| {
            EMOTION_CHANNELS
                .iter()
                .map(|channel| (channel.to_string(), 0.0))
                .collect()
        });
        levels.insert(point.label.clone(), point.intensity);
    }

    let samples: Vec<EmotionSample> = by_time
        .into_iter()
        .map(|(key, levels)| EmotionSample {
            time: key as f64 / 10.0,
            levels,
        })
        .collect();

    let mut series = Vec::with_capacity(samples.len());
    let mut iter = samples.into_iter().peekable();
    while let Some(current) = iter.next() {
        let midpoint = iter.peek().and_then(|next| {
            let gap = next.time - current.time;
            if gap <= 2.0 {
                return None;
            }
            let channels: BTreeSet<&String> =
                current.levels.keys().chain(next.levels.keys()).collect();
            let levels = channels
                .into_iter()
                .map(|channel| {
                    let a = current.level(channel);
                    let b = next.level(channel);
                    (channel.clone(), (a + b) / 2.0)
                })
                .collect();
            Some(EmotionSample {
                time: current.time + gap / 2.0,
                levels,
            })
        });
        series.push(current);
        if let Some(mid) = midpoint {
            series.push(mid);
        }
    }
    series
}
