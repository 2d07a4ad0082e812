/*!
 * Resource inventory and audit against expected counts.
 *
 * The inventory summarizes what a document contains per unit. The audit
 * compares those counts with an expectations file of the form
 * `{"1": {"videos": 3, "games": 5}, ...}`.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extraction::UnitMap;

/// Per-unit counts written to `resource_summary.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub title: String,
    pub video_count: usize,
    pub game_count: usize,
}

pub type ResourceSummary = IndexMap<String, UnitSummary>;

/// Expected counts for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub videos: usize,
    pub games: usize,
}

pub type Expectations = IndexMap<String, Expectation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    Complete,
    Partial,
    Incomplete,
}

impl AuditStatus {
    /// Both counts match, one matches, or neither
    pub fn from_counts(found: Expectation, expected: Expectation) -> Self {
        match (found.videos == expected.videos, found.games == expected.games) {
            (true, true) => Self::Complete,
            (true, false) | (false, true) => Self::Partial,
            (false, false) => Self::Incomplete,
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Complete => "Complete",
            Self::Partial => "Partial",
            Self::Incomplete => "Incomplete",
        };
        write!(f, "{}", name)
    }
}

/// One line of `resource_audit.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    pub unit: String,
    pub title: String,
    pub source_videos: usize,
    pub expected_videos: usize,
    pub source_games: usize,
    pub expected_games: usize,
    pub status: AuditStatus,
}

/// File name of one unit's inventory file
pub fn unit_file_name(unit_id: &str) -> String {
    format!("unit{}_resources.json", unit_id)
}

/// Unit ids sorted numerically; non-numeric ids go last in their original order
pub fn numeric_order(units: &UnitMap) -> Vec<&str> {
    let mut ids: Vec<&str> = units.keys().map(String::as_str).collect();
    ids.sort_by_key(|id| id.parse::<u64>().unwrap_or(u64::MAX));
    ids
}

pub fn resource_summary(units: &UnitMap) -> ResourceSummary {
    units
        .iter()
        .map(|(id, unit)| {
            (id.clone(), UnitSummary {
                title: unit.title.clone(),
                video_count: unit.videos.len(),
                game_count: unit.games.len(),
            })
        })
        .collect()
}

pub fn parse_expectations(json: &str) -> Result<Expectations, serde_json::Error> {
    serde_json::from_str(json)
}

/// Compare every unit that has an expectation, in numeric order
pub fn audit(units: &UnitMap, expectations: &Expectations) -> Vec<AuditRow> {
    numeric_order(units)
        .into_iter()
        .filter_map(|id| {
            let expected = *expectations.get(id)?;
            let unit = &units[id];
            let found = Expectation {
                videos: unit.videos.len(),
                games: unit.games.len(),
            };
            Some(AuditRow {
                unit: id.to_string(),
                title: unit.title.clone(),
                source_videos: found.videos,
                expected_videos: expected.videos,
                source_games: found.games,
                expected_games: expected.games,
                status: AuditStatus::from_counts(found, expected),
            })
        })
        .collect()
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Fixed-width inventory table, one line per unit
pub fn inventory_table(units: &UnitMap) -> Vec<String> {
    let mut lines = vec![
        "=".repeat(60),
        format!("{:<6}{:<30}{:<8}{:<8}", "UNIT", "TITLE", "VIDEOS", "GAMES"),
        "-".repeat(60),
    ];
    for id in numeric_order(units) {
        let unit = &units[id];
        lines.push(format!(
            "{:<6}{:<30}{:<8}{:<8}",
            id,
            clip(&unit.title, 28),
            unit.videos.len(),
            unit.games.len()
        ));
    }
    lines.push("=".repeat(60));
    lines
}

/// Fixed-width comparison table for audit rows
pub fn audit_table(rows: &[AuditRow]) -> Vec<String> {
    let mut lines = vec![
        "=".repeat(95),
        format!(
            "{:<6}{:<25}{:<12}{:<13}{:<11}{:<12}{:<10}",
            "UNIT", "TITLE", "SRC VIDEOS", "EXP VIDEOS", "SRC GAMES", "EXP GAMES", "STATUS"
        ),
        "-".repeat(95),
    ];
    for row in rows {
        lines.push(format!(
            "{:<6}{:<25}{:<12}{:<13}{:<11}{:<12}{:<10}",
            row.unit,
            clip(&row.title, 23),
            row.source_videos,
            row.expected_videos,
            row.source_games,
            row.expected_games,
            row.status.to_string()
        ));
    }
    lines.push("=".repeat(95));
    lines
}
