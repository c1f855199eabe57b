//! Usage statistics
//!
//! An explicit, cloneable append-only store. Rendering and decoding never
//! touch it; callers record what they want after a request completes.

use crate::error::{QrError, Result};
use crate::models::Rgba;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::{Arc, Mutex, MutexGuard};

/// How many colors the summary ranks
pub const TOP_COLORS: usize = 5;

fn default_background() -> String {
    "#FFFFFF".to_string()
}

/// One generated code, as reported by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticRecord {
    /// Background color the code was rendered with
    #[serde(default = "default_background")]
    pub background_color: String,
    /// Whether the bubble style was used
    #[serde(default)]
    pub bubble: bool,
    /// When the code was generated
    pub timestamp: DateTime<Utc>,
}

/// Aggregate view over all records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    /// Number of records
    pub total: usize,
    /// Most used background colors, most frequent first
    pub top_colors: Vec<ColorCount>,
    /// Share of bubble-style codes, percent rounded to two decimals
    pub bubble_percentage: f64,
}

/// A color and how often it was used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorCount {
    /// Canonical color string
    pub color: String,
    /// Number of records using it
    pub count: usize,
}

/// Thread-safe append-only record log
#[derive(Debug, Clone, Default)]
pub struct StatisticsStore {
    records: Arc<Mutex<Vec<StatisticRecord>>>,
}

impl StatisticsStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<StatisticRecord>> {
        // Appends cannot leave the vector half-written, so a poisoned lock is still usable
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a record
    pub fn record(&self, record: StatisticRecord) {
        tracing::debug!(
            background = %record.background_color,
            bubble = record.bubble,
            "statistic recorded"
        );
        self.guard().push(record);
    }

    /// Copy of every record in insertion order
    pub fn snapshot(&self) -> Vec<StatisticRecord> {
        self.guard().clone()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Whether nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top colors and bubble share
    pub fn summary(&self) -> StatisticsSummary {
        summarize(&self.guard())
    }

    /// Build a store from newline-delimited JSON records, skipping blank lines
    pub fn load_json_lines<R: BufRead>(reader: R) -> Result<Self> {
        let store = Self::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: StatisticRecord = serde_json::from_str(&line)
                .map_err(|e| QrError::InvalidInput(format!("record on line {}: {}", n + 1, e)))?;
            store.guard().push(record);
        }
        Ok(store)
    }
}

/// Parseable colors are grouped by RGB value, anything else by its trimmed text
fn canonical_color(raw: &str) -> String {
    Rgba::parse(raw)
        .map(|c| c.to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

fn summarize(records: &[StatisticRecord]) -> StatisticsSummary {
    let total = records.len();
    if total == 0 {
        return StatisticsSummary {
            total,
            top_colors: Vec::new(),
            bubble_percentage: 0.0,
        };
    }

    // First-appearance order breaks ties
    let mut counts: Vec<ColorCount> = Vec::new();
    for record in records {
        let color = canonical_color(&record.background_color);
        match counts.iter_mut().find(|c| c.color == color) {
            Some(entry) => entry.count += 1,
            None => counts.push(ColorCount { color, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_COLORS);

    let bubbles = records.iter().filter(|r| r.bubble).count();
    let percentage = bubbles as f64 / total as f64 * 100.0;

    StatisticsSummary {
        total,
        top_colors: counts,
        bubble_percentage: (percentage * 100.0).round() / 100.0,
    }
}
