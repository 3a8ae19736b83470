//! Local backups of the entry history
//!
//! Each backup is a gzip-compressed JSON document holding the entries, a
//! metadata block (counts, date span, checksum) and the user settings.
//! Only the newest `keep` backups are retained.
//!
//! File naming: `moodlog-backup-YYYYMMDD-HHMMSS-mmm.json.gz`. Names
//! without the millisecond part are still recognized.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::UserSettings;
use crate::error::{Error, Result};
use crate::models::MoodEntry;

pub const BACKUP_VERSION: &str = "2.0";

const BACKUP_PREFIX: &str = "moodlog-backup-";
const BACKUP_SUFFIX: &str = ".json.gz";
const NAME_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";
const NAME_MILLIS_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub total_entries: usize,
    pub first_entry: Option<NaiveDate>,
    pub last_entry: Option<NaiveDate>,
    pub backup_date: DateTime<Utc>,
    pub version: String,
    /// SHA-256 of the serialized entries, hex encoded
    pub checksum: String,
}

/// Contents of a backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupFile {
    pub entries: Vec<MoodEntry>,
    pub metadata: BackupMetadata,
    pub settings: UserSettings,
}

impl BackupFile {
    pub fn new(entries: Vec<MoodEntry>, settings: UserSettings, now: DateTime<Utc>) -> Result<Self> {
        let checksum = entries_checksum(&entries)?;
        let metadata = BackupMetadata {
            total_entries: entries.len(),
            first_entry: entries.iter().map(|e| e.date).min(),
            last_entry: entries.iter().map(|e| e.date).max(),
            backup_date: now,
            version: BACKUP_VERSION.to_string(),
            checksum,
        };
        Ok(Self {
            entries,
            metadata,
            settings,
        })
    }

    /// Check the entries against the recorded checksum
    pub fn verify(&self) -> Result<()> {
        let actual = entries_checksum(&self.entries)?;
        if actual != self.metadata.checksum {
            return Err(Error::Backup(format!(
                "Checksum mismatch (expected {}, got {})",
                self.metadata.checksum, actual
            )));
        }
        Ok(())
    }
}

/// Hex SHA-256 of the entries' JSON serialization
pub fn entries_checksum(entries: &[MoodEntry]) -> Result<String> {
    let bytes = serde_json::to_vec(entries)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Information about a stored backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    /// Compressed size in bytes
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Result of a prune operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruneResult {
    pub deleted_names: Vec<String>,
    pub retained_count: usize,
}

/// Generate a backup filename for `now`
pub fn backup_name(now: DateTime<Utc>) -> String {
    format!(
        "{}{}-{:03}{}",
        BACKUP_PREFIX,
        now.format(NAME_TIME_FORMAT),
        now.timestamp_subsec_millis(),
        BACKUP_SUFFIX
    )
}

/// Parse backup creation time from filename
pub fn parse_backup_time(name: &str) -> Option<DateTime<Utc>> {
    let stamp = name.strip_prefix(BACKUP_PREFIX)?.strip_suffix(BACKUP_SUFFIX)?;
    let (seconds, millis) = match stamp.rsplit_once('-') {
        Some((seconds, millis)) if millis.len() == NAME_MILLIS_WIDTH => {
            (seconds, millis.parse::<i64>().ok()?)
        }
        _ => (stamp, 0),
    };
    NaiveDateTime::parse_from_str(seconds, NAME_TIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc() + Duration::milliseconds(millis))
}

/// Backups kept in a local directory
pub struct BackupManager {
    dir: PathBuf,
    keep: usize,
}

impl BackupManager {
    pub fn new(dir: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            dir: dir.into(),
            keep,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                Error::Backup(format!(
                    "Failed to create backup directory {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
            info!("Created backup directory: {}", self.dir.display());
        }
        Ok(())
    }

    /// Write a backup of `entries`, then prune old ones
    pub fn create(
        &self,
        entries: &[MoodEntry],
        settings: &UserSettings,
        now: DateTime<Utc>,
    ) -> Result<BackupInfo> {
        self.ensure_dir()?;

        let name = backup_name(now);
        let path = self.dir.join(&name);
        if path.exists() {
            return Err(Error::Backup(format!(
                "Backup already exists: {}",
                path.display()
            )));
        }

        let backup = BackupFile::new(entries.to_vec(), settings.clone(), now)?;

        let writer = BufWriter::new(File::create(&path)?);
        let mut encoder = GzEncoder::new(writer, Compression::default());
        serde_json::to_writer_pretty(&mut encoder, &backup)?;
        encoder.finish()?.flush()?;

        let size = fs::metadata(&path)?.len();
        info!(
            name = %name,
            entries = backup.metadata.total_entries,
            "Created backup"
        );

        self.prune()?;

        Ok(BackupInfo {
            name,
            path,
            size,
            created_at: now,
        })
    }

    /// All backups, newest first
    pub fn list(&self) -> Result<Vec<BackupInfo>> {
        let mut backups = Vec::new();

        if !self.dir.exists() {
            return Ok(backups);
        }

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(created_at) = parse_backup_time(name) else {
                continue;
            };

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            backups.push(BackupInfo {
                name: name.to_string(),
                path: path.clone(),
                size: metadata.len(),
                created_at,
            });
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Read and verify a backup
    pub fn read(&self, name: &str) -> Result<BackupFile> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Err(Error::NotFound(format!("backup {}", name)));
        }

        let mut decoder = GzDecoder::new(BufReader::new(File::open(&path)?));
        let mut content = String::new();
        decoder.read_to_string(&mut content)?;

        let backup: BackupFile = serde_json::from_str(&content)
            .map_err(|e| Error::Backup(format!("Unreadable backup {}: {}", name, e)))?;
        backup.verify()?;
        Ok(backup)
    }

    /// The newest backup, if any
    pub fn latest(&self) -> Result<Option<BackupInfo>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Delete all but the newest `keep` backups
    pub fn prune(&self) -> Result<PruneResult> {
        let backups = self.list()?;
        let mut result = PruneResult::default();

        for backup in backups.iter().skip(self.keep) {
            if let Err(e) = fs::remove_file(&backup.path) {
                warn!("Failed to delete backup {}: {}", backup.name, e);
                continue;
            }
            result.deleted_names.push(backup.name.clone());
        }

        result.retained_count = backups.len() - result.deleted_names.len();
        if !result.deleted_names.is_empty() {
            info!(
                deleted = result.deleted_names.len(),
                retained = result.retained_count,
                "Pruned old backups"
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{day, sample_journal};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn setup(keep: usize) -> (TempDir, BackupManager) {
        let dir = TempDir::new().unwrap();
        let manager = BackupManager::new(dir.path().join("backups"), keep);
        (dir, manager)
    }

    #[test]
    fn test_backup_name_roundtrip() {
        let name = backup_name(at(0));
        assert_eq!(name, "moodlog-backup-20240115-120000-000.json.gz");
        assert_eq!(parse_backup_time(&name), Some(at(0)));

        let later = at(5) + Duration::milliseconds(42);
        assert_eq!(
            backup_name(later),
            "moodlog-backup-20240115-120005-042.json.gz"
        );
        assert_eq!(parse_backup_time(&backup_name(later)), Some(later));

        assert_eq!(
            parse_backup_time("moodlog-backup-20240115-120000.json.gz"),
            Some(at(0))
        );
        assert_eq!(parse_backup_time("notes.txt"), None);
    }

    #[test]
    fn test_create_and_read() {
        let (_dir, manager) = setup(5);
        let info = manager
            .create(&sample_journal(), &UserSettings::default(), at(0))
            .unwrap();
        assert!(info.path.exists());

        let backup = manager.read(&info.name).unwrap();
        assert_eq!(backup.entries, sample_journal());
        assert_eq!(backup.metadata.total_entries, 6);
        assert_eq!(backup.metadata.first_entry, Some(day("2024-01-10")));
        assert_eq!(backup.metadata.last_entry, Some(day("2024-01-15")));
        assert_eq!(backup.metadata.version, "2.0");
        assert_eq!(backup.settings, UserSettings::default());
    }

    #[test]
    fn test_metadata_field_names() {
        let backup = BackupFile::new(vec![], UserSettings::default(), at(0)).unwrap();
        let json = serde_json::to_value(&backup).unwrap();
        assert_eq!(json["metadata"]["totalEntries"], 0);
        assert!(json["metadata"]["firstEntry"].is_null());
        assert!(json["metadata"]["backupDate"].is_string());
        assert_eq!(json["settings"]["notifications"], true);
    }

    #[test]
    fn test_tampered_backup_fails_verification() {
        let mut backup = BackupFile::new(sample_journal(), UserSettings::default(), at(0)).unwrap();
        backup.entries[0].intensity = 1;
        assert!(matches!(backup.verify(), Err(Error::Backup(_))));
    }

    #[test]
    fn test_keeps_only_newest() {
        let (_dir, manager) = setup(5);
        for i in 0..7 {
            manager
                .create(&sample_journal(), &UserSettings::default(), at(i))
                .unwrap();
        }

        let backups = manager.list().unwrap();
        assert_eq!(backups.len(), 5);
        assert_eq!(backups[0].created_at, at(6));
        assert_eq!(backups[4].created_at, at(2));
        assert_eq!(manager.latest().unwrap().unwrap().created_at, at(6));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_dir, manager) = setup(5);
        manager.create(&[], &UserSettings::default(), at(0)).unwrap();
        assert!(manager.create(&[], &UserSettings::default(), at(0)).is_err());
    }

    #[test]
    fn test_backups_within_one_second_get_distinct_names() {
        let (_dir, manager) = setup(5);
        let first = manager.create(&[], &UserSettings::default(), at(0)).unwrap();
        let second = manager
            .create(&[], &UserSettings::default(), at(0) + Duration::milliseconds(1))
            .unwrap();

        assert_ne!(first.name, second.name);
        let backups = manager.list().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].name, second.name);
    }

    #[test]
    fn test_list_ignores_other_files() {
        let (_dir, manager) = setup(5);
        manager.create(&[], &UserSettings::default(), at(0)).unwrap();
        fs::write(manager.dir().join("readme.txt"), "hi").unwrap();
        assert_eq!(manager.list().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_backup() {
        let (_dir, manager) = setup(5);
        assert!(manager.list().unwrap().is_empty());
        assert!(matches!(
            manager.read("moodlog-backup-20200101-000000-000.json.gz"),
            Err(Error::NotFound(_))
        ));
    }
}
