//! Export, import, and share payloads
//!
//! Supports:
//! - Full JSON export (`{entries, exportDate, version}`) and CSV export
//! - Import of any JSON document carrying an `entries` array, merged by date
//! - Share payloads: the last 10 entries, or a compact summary of the last 3

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::integrity::validate_entry;
use crate::models::{sort_chronologically, MoodEntry};

/// Version tag written into exports and share payloads
pub const EXPORT_VERSION: &str = "1.0";

/// Entries included in a share payload
pub const SHARE_ENTRIES: usize = 10;

/// Entries included in the compact share summary
pub const SUMMARY_ENTRIES: usize = 3;

const SUMMARY_REFLECTION_CHARS: usize = 50;

pub const SHARE_TITLE: &str = "MoodDiary Export";

/// Full export file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub entries: Vec<MoodEntry>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportFile {
    pub fn new(entries: Vec<MoodEntry>, exported_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            export_date: exported_at,
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Suggested file name for an export made on `date`
    pub fn file_name(date: NaiveDate) -> String {
        format!("mood-diary-export-{}.json", date.format("%Y-%m-%d"))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Share payload with the most recent entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub title: String,
    pub entries: Vec<MoodEntry>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// One entry reduced to what fits in a QR-sized payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedEntry {
    pub date: NaiveDate,
    /// Mood labels only
    pub moods: Vec<String>,
    pub intensity: u8,
    pub energy: u8,
    /// First 50 characters followed by "...", or empty
    pub reflection: String,
}

/// Compact summary of the last few entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSummary {
    pub title: String,
    pub entries: Vec<SharedEntry>,
    /// Size of the whole history, not just the entries included
    pub count: usize,
    pub export_date: NaiveDate,
    pub version: String,
}

impl ShareSummary {
    /// Single-line JSON, as it would be encoded into a QR code
    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn latest(entries: &[MoodEntry], n: usize) -> Vec<MoodEntry> {
    let mut sorted = entries.to_vec();
    sort_chronologically(&mut sorted);
    let skip = sorted.len().saturating_sub(n);
    sorted.split_off(skip)
}

pub fn share_payload(entries: &[MoodEntry], title: &str, now: DateTime<Utc>) -> SharePayload {
    SharePayload {
        title: title.to_string(),
        entries: latest(entries, SHARE_ENTRIES),
        export_date: now,
        version: EXPORT_VERSION.to_string(),
    }
}

fn truncate_reflection(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let head: String = text.chars().take(SUMMARY_REFLECTION_CHARS).collect();
    format!("{}...", head)
}

impl From<&MoodEntry> for SharedEntry {
    fn from(entry: &MoodEntry) -> Self {
        Self {
            date: entry.date,
            moods: entry.moods.iter().map(|m| m.label.clone()).collect(),
            intensity: entry.effective_intensity(),
            energy: entry.effective_energy(),
            reflection: truncate_reflection(&entry.reflection),
        }
    }
}

pub fn share_summary(entries: &[MoodEntry], today: NaiveDate) -> ShareSummary {
    ShareSummary {
        title: SHARE_TITLE.to_string(),
        entries: latest(entries, SUMMARY_ENTRIES)
            .iter()
            .map(SharedEntry::from)
            .collect(),
        count: entries.len(),
        export_date: today,
        version: EXPORT_VERSION.to_string(),
    }
}

/// Export entries as CSV, oldest first
pub fn entries_to_csv(entries: &[MoodEntry]) -> Result<String> {
    let mut sorted = entries.to_vec();
    sort_chronologically(&mut sorted);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "date",
        "moods",
        "intensity",
        "energy",
        "sleepQuality",
        "triggers",
        "reflection",
    ])?;

    for entry in &sorted {
        let moods = entry
            .moods
            .iter()
            .map(|m| m.label.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        writer.write_record([
            entry.date.to_string(),
            moods,
            entry.intensity.to_string(),
            entry.energy.to_string(),
            entry
                .sleep_quality
                .map(|s| s.to_string())
                .unwrap_or_default(),
            entry.triggers.join("; "),
            entry.reflection.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Entries pulled from an import document
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub entries: Vec<MoodEntry>,
    /// Free-text version tag, if present; not enforced
    pub version: Option<String>,
}

/// Parse an import document
///
/// Any JSON object with an `entries` array is accepted (exports, share
/// payloads, and backups all qualify). Every entry must pass validation, or
/// the whole file is rejected. Nothing is merged here, so a failure leaves
/// the store untouched.
pub fn parse_import(content: &str) -> Result<ImportFile> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| Error::Import(format!("Invalid JSON: {}", e)))?;

    let version = value
        .get("version")
        .or_else(|| value.pointer("/metadata/version"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let Some(entries @ Value::Array(_)) = value.get("entries") else {
        return Err(Error::Import("Invalid file format".to_string()));
    };

    let entries: Vec<MoodEntry> = serde_json::from_value(entries.clone())
        .map_err(|e| Error::Import(format!("Invalid entry: {}", e)))?;
    validate_imported(&entries)?;

    debug!(count = entries.len(), version = ?version, "Parsed import file");
    Ok(ImportFile { entries, version })
}

/// Reject a batch of imported entries if any of them breaks the model invariants
pub fn validate_imported(entries: &[MoodEntry]) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        let issues = validate_entry(entry);
        if issues.is_empty() {
            continue;
        }
        let details = issues
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Import(format!(
            "Entry {} ({}) is invalid: {}",
            index + 1,
            entry.date,
            details
        )));
    }
    Ok(())
}

/// Statistics from an import merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    /// Entries in the import file
    pub imported: usize,
    /// Entries that made it into the store
    pub added: usize,
    /// Entries dropped because their date was already present
    pub skipped: usize,
}

/// Concatenate `existing` and `imported`, keeping the first entry per date
pub fn merge_by_date(
    existing: Vec<MoodEntry>,
    imported: Vec<MoodEntry>,
) -> (Vec<MoodEntry>, ImportStats) {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut merged: Vec<MoodEntry> = existing
        .into_iter()
        .filter(|e| seen.insert(e.date))
        .collect();

    let mut stats = ImportStats {
        imported: imported.len(),
        ..Default::default()
    };
    for entry in imported {
        if seen.insert(entry.date) {
            merged.push(entry);
            stats.added += 1;
        } else {
            stats.skipped += 1;
        }
    }
    (merged, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{day, entry, sample_journal, EntryBuilder};

    #[test]
    fn test_export_file_shape() {
        let export = ExportFile::new(sample_journal(), Utc::now());
        let json: Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();

        assert_eq!(json["version"], "1.0");
        assert!(json["exportDate"].is_string());
        assert_eq!(json["entries"].as_array().unwrap().len(), 6);
        assert_eq!(
            ExportFile::file_name(day("2024-01-15")),
            "mood-diary-export-2024-01-15.json"
        );
    }

    #[test]
    fn test_parse_import_accepts_export() {
        let export = ExportFile::new(sample_journal(), Utc::now());
        let parsed = parse_import(&export.to_json().unwrap()).unwrap();
        assert_eq!(parsed.entries.len(), 6);
        assert_eq!(parsed.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_parse_import_rejects_bad_shapes() {
        for content in ["not json", "[]", r#"{"entries": {}}"#, r#"{"data": []}"#] {
            let err = parse_import(content).unwrap_err();
            assert!(matches!(err, Error::Import(_)), "accepted {}", content);
        }
    }

    #[test]
    fn test_parse_import_rejects_invalid_entries() {
        let content = r#"{"entries": [{"id": "x", "date": "2024-01-10", "moods": []}]}"#;
        let err = parse_import(content).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
        let message = err.to_string();
        assert!(message.contains("Select at least one mood"), "{}", message);
        assert!(message.contains("Intensity must be between 1 and 10"), "{}", message);

        // one bad entry rejects the whole file
        let mut entries = sample_journal();
        entries[3].energy = 0;
        let export = ExportFile::new(entries, Utc::now());
        assert!(matches!(
            parse_import(&export.to_json().unwrap()),
            Err(Error::Import(_))
        ));
    }

    #[test]
    fn test_parse_import_backup_version() {
        let content = r#"{"entries": [], "metadata": {"version": "2.0"}}"#;
        let parsed = parse_import(content).unwrap();
        assert_eq!(parsed.version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_merge_keeps_first_per_date() {
        let existing = vec![
            EntryBuilder::new("2024-01-01").id("a").build(),
            EntryBuilder::new("2024-01-02").id("b").build(),
        ];
        let imported = vec![
            EntryBuilder::new("2024-01-02").id("c").build(),
            EntryBuilder::new("2024-01-03").id("d").build(),
            EntryBuilder::new("2024-01-03").id("e").build(),
        ];

        let (merged, stats) = merge_by_date(existing, imported);
        let ids: Vec<_> = merged.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);
        assert_eq!(
            stats,
            ImportStats {
                imported: 3,
                added: 1,
                skipped: 2
            }
        );
    }

    #[test]
    fn test_merge_collapses_existing_duplicates() {
        let existing = vec![
            EntryBuilder::new("2024-01-01").id("a").build(),
            EntryBuilder::new("2024-01-01").id("b").build(),
        ];
        let (merged, stats) = merge_by_date(existing, vec![]);
        assert_eq!(merged.len(), 1);
        assert_eq!(stats.added, 0);
    }

    #[test]
    fn test_share_payload_takes_last_ten() {
        let entries: Vec<_> = (1..=15)
            .map(|d| entry(&format!("2024-01-{:02}", d), 5))
            .collect();
        let payload = share_payload(&entries, SHARE_TITLE, Utc::now());
        assert_eq!(payload.entries.len(), 10);
        assert_eq!(payload.entries[0].date, day("2024-01-06"));
        assert_eq!(payload.version, "1.0");
    }

    #[test]
    fn test_share_summary() {
        let entries = sample_journal();
        let summary = share_summary(&entries, day("2024-01-16"));

        assert_eq!(summary.count, 6);
        assert_eq!(summary.title, "MoodDiary Export");
        assert_eq!(summary.entries.len(), 3);
        assert_eq!(summary.entries[2].date, day("2024-01-15"));
        assert_eq!(summary.entries[2].moods, vec!["Very Happy", "Grateful"]);
        assert!(summary.entries[2].reflection.ends_with("..."));
        assert_eq!(summary.entries[2].reflection.chars().count(), 53);

        let json = summary.to_compact_json().unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"exportDate\":\"2024-01-16\""));
    }

    #[test]
    fn test_empty_reflection_stays_empty() {
        let shared = SharedEntry::from(&entry("2024-01-01", 5));
        assert_eq!(shared.reflection, "");
    }

    #[test]
    fn test_csv_export() {
        let csv = entries_to_csv(&sample_journal()).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "date");
        assert_eq!(&headers[4], "sleepQuality");

        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[0][0], "2024-01-10");
        assert_eq!(&rows[0][1], "Angry; Sad");
        assert_eq!(&rows[5][5], "Work/Career; Achievement; Social");
    }
}
