//! Entry validation and data-integrity repair
//!
//! Two layers:
//! - `validate_entry` checks a typed entry before it is written
//! - `check_store` / `repair_store` inspect raw persisted JSON, report what is
//!   wrong, and rebuild a usable entry list by substituting defaults
//!
//! Neither layer returns an error for bad data; problems are reported as
//! values so callers decide what to surface.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::MoodKind;
use crate::error::{Error, Result};
use crate::models::{ImageAnalysis, Mood, MoodEntry, DEFAULT_ENERGY, DEFAULT_INTENSITY};

/// Maximum number of issues included in a report
const MAX_REPORTED_ISSUES: usize = 10;

/// A single invariant violation on an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a typed entry against the model invariants
pub fn validate_entry(entry: &MoodEntry) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if entry.id.trim().is_empty() {
        issues.push(ValidationIssue::new("id", "Missing ID"));
    }

    if entry.moods.is_empty() {
        issues.push(ValidationIssue::new("moods", "Select at least one mood"));
    }
    for (i, mood) in entry.moods.iter().enumerate() {
        if entry.moods[..i].iter().any(|m| m.same_selection(mood)) {
            issues.push(ValidationIssue::new(
                "moods",
                format!("Duplicate mood: {}", mood.label),
            ));
        }
    }

    if !(1..=10).contains(&entry.intensity) {
        issues.push(ValidationIssue::new(
            "intensity",
            format!("Intensity must be between 1 and 10 (got {})", entry.intensity),
        ));
    }

    if !(1..=5).contains(&entry.energy) {
        issues.push(ValidationIssue::new(
            "energy",
            format!("Energy must be between 1 and 5 (got {})", entry.energy),
        ));
    }

    if let Some(sleep) = entry.sleep_quality {
        if !(1..=5).contains(&sleep) {
            issues.push(ValidationIssue::new(
                "sleepQuality",
                format!("Sleep quality must be between 1 and 5 (got {})", sleep),
            ));
        }
    }

    issues
}

/// Validate an entry, turning any issues into a single error
pub fn ensure_valid(entry: &MoodEntry) -> Result<()> {
    let issues = validate_entry(entry);
    if issues.is_empty() {
        return Ok(());
    }
    let description = issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(Error::Validation(description))
}

/// Result of inspecting the persisted store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub is_valid: bool,
    /// First issues found, capped for display
    pub issues: Vec<String>,
    pub total_entries: usize,
    pub corrupted_entries: usize,
}

impl IntegrityReport {
    fn clean(total_entries: usize) -> Self {
        Self {
            is_valid: true,
            issues: vec![],
            total_entries,
            corrupted_entries: 0,
        }
    }

    fn unreadable(issue: &str) -> Self {
        Self {
            is_valid: false,
            issues: vec![issue.to_string()],
            total_entries: 0,
            corrupted_entries: 1,
        }
    }
}

/// Inspect raw store contents (`None` when nothing has been persisted yet)
pub fn check_store(raw: Option<&str>) -> IntegrityReport {
    let Some(raw) = raw else {
        return IntegrityReport::clean(0);
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => return IntegrityReport::unreadable("Data is corrupted and cannot be parsed"),
    };

    let Value::Array(entries) = value else {
        return IntegrityReport::unreadable("Data is not in correct array format");
    };

    let mut issues = Vec::new();
    let mut corrupted = 0;

    for (index, entry) in entries.iter().enumerate() {
        let n = index + 1;
        let Some(obj) = entry.as_object() else {
            issues.push(format!("Entry {}: Not an object", n));
            corrupted += 1;
            continue;
        };

        if !has_text(obj, "id") {
            issues.push(format!("Entry {}: Missing ID", n));
        }
        match obj.get("date").and_then(Value::as_str) {
            None | Some("") => issues.push(format!("Entry {}: Missing date", n)),
            Some(s) if parse_date(s).is_none() => {
                issues.push(format!("Entry {}: Invalid date", n))
            }
            Some(_) => {}
        }
        if !obj
            .get("moods")
            .and_then(Value::as_array)
            .is_some_and(|m| !m.is_empty())
        {
            issues.push(format!("Entry {}: Invalid moods data", n));
            corrupted += 1;
        }
        if int_in_range(obj.get("intensity"), 1, 10).is_none() {
            issues.push(format!("Entry {}: Invalid intensity value", n));
        }
        if int_in_range(obj.get("energy"), 1, 5).is_none() {
            issues.push(format!("Entry {}: Invalid energy value", n));
        }
        if let Some(sleep) = obj.get("sleepQuality").filter(|v| !v.is_null()) {
            if int_in_range(Some(sleep), 1, 5).is_none() {
                issues.push(format!("Entry {}: Invalid sleep quality value", n));
            }
        }
    }

    let is_valid = issues.is_empty();
    issues.truncate(MAX_REPORTED_ISSUES);

    IntegrityReport {
        is_valid,
        issues,
        total_entries: entries.len(),
        corrupted_entries: corrupted,
    }
}

/// Outcome of a repair pass
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub entries: Vec<MoodEntry>,
    /// Entries that needed at least one substitution
    pub repaired: usize,
    /// Records that could not be turned into an entry at all
    pub dropped: usize,
}

/// Rebuild a usable entry list from raw store contents
///
/// Unparseable or non-array data is treated as an empty store.
pub fn repair_store(raw: Option<&str>, now: DateTime<Utc>) -> RepairOutcome {
    let mut outcome = RepairOutcome {
        entries: vec![],
        repaired: 0,
        dropped: 0,
    };

    let Some(raw) = raw else {
        return outcome;
    };

    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!("Store is not an array; treating it as empty");
            return outcome;
        }
        Err(e) => {
            warn!(error = %e, "Store is not valid JSON; treating it as empty");
            return outcome;
        }
    };

    let today = now.date_naive();

    for (index, record) in records.into_iter().enumerate() {
        let Value::Object(mut obj) = record else {
            outcome.dropped += 1;
            continue;
        };

        let changed = repair_record(&mut obj, index, today, now);

        match serde_json::from_value::<MoodEntry>(Value::Object(obj)) {
            Ok(entry) => {
                if changed {
                    outcome.repaired += 1;
                }
                outcome.entries.push(entry);
            }
            Err(e) => {
                warn!(index, error = %e, "Dropping entry that could not be repaired");
                outcome.dropped += 1;
            }
        }
    }

    debug!(
        kept = outcome.entries.len(),
        repaired = outcome.repaired,
        dropped = outcome.dropped,
        "Repair pass complete"
    );

    outcome
}

/// Substitute defaults for every broken field; returns whether anything changed
fn repair_record(
    obj: &mut Map<String, Value>,
    index: usize,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> bool {
    let mut changed = false;

    match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(Value::Number(n)) => {
            let id = n.to_string();
            obj.insert("id".into(), Value::String(id));
            changed = true;
        }
        _ => {
            let id = format!("repaired_{}_{}", now.timestamp_millis(), index);
            obj.insert("id".into(), Value::String(id));
            changed = true;
        }
    }

    let date = match obj.get("date").and_then(Value::as_str).and_then(parse_date) {
        Some(d) => d,
        None => {
            obj.insert("date".into(), Value::String(today.to_string()));
            changed = true;
            today
        }
    };

    let moods: Vec<Value> = obj
        .get("moods")
        .and_then(Value::as_array)
        .map(|moods| {
            moods
                .iter()
                .filter(|m| serde_json::from_value::<Mood>((*m).clone()).is_ok())
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    let moods_intact = obj
        .get("moods")
        .and_then(Value::as_array)
        .is_some_and(|m| m.len() == moods.len() && !m.is_empty());
    if !moods_intact {
        let moods = if moods.is_empty() {
            vec![serde_json::to_value(MoodKind::Neutral.to_mood()).unwrap_or(Value::Null)]
        } else {
            moods
        };
        obj.insert("moods".into(), Value::Array(moods));
        changed = true;
    }

    if int_in_range(obj.get("intensity"), 1, 10).is_none() {
        obj.insert("intensity".into(), Value::from(DEFAULT_INTENSITY));
        changed = true;
    }

    if int_in_range(obj.get("energy"), 1, 5).is_none() {
        obj.insert("energy".into(), Value::from(DEFAULT_ENERGY));
        changed = true;
    }

    if let Some(sleep) = obj.get("sleepQuality") {
        if !sleep.is_null() && int_in_range(Some(sleep), 1, 5).is_none() {
            obj.remove("sleepQuality");
            changed = true;
        }
    }

    for key in ["image", "audioNote"] {
        if obj.get(key).is_some_and(|v| !v.is_null() && !v.is_string()) {
            obj.remove(key);
            changed = true;
        }
    }

    if let Some(analysis) = obj.get("imageAnalysis") {
        let malformed = serde_json::from_value::<ImageAnalysis>(analysis.clone()).is_err();
        if !analysis.is_null() && malformed {
            obj.remove("imageAnalysis");
            changed = true;
        }
    }

    if !obj.get("reflection").is_some_and(Value::is_string) {
        obj.insert("reflection".into(), Value::String(String::new()));
        changed = true;
    }

    let triggers_ok = obj
        .get("triggers")
        .and_then(Value::as_array)
        .is_some_and(|t| t.iter().all(Value::is_string));
    if !triggers_ok {
        let kept: Vec<Value> = obj
            .get("triggers")
            .and_then(Value::as_array)
            .map(|t| t.iter().filter(|v| v.is_string()).cloned().collect())
            .unwrap_or_default();
        obj.insert("triggers".into(), Value::Array(kept));
        changed = true;
    }

    if !obj
        .get("timestamp")
        .and_then(Value::as_i64)
        .is_some_and(|t| t > 0)
    {
        let millis = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        obj.insert("timestamp".into(), Value::from(millis));
        changed = true;
    }

    changed
}

fn has_text(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}

fn int_in_range(value: Option<&Value>, min: i64, max: i64) -> Option<i64> {
    value
        .and_then(Value::as_i64)
        .filter(|v| (min..=max).contains(v))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
