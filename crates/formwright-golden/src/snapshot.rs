//! Snapshot management for golden tests
//!
//! A snapshot is a plain text file: `# key: value` header lines, a `---`
//! separator line, then the emitted source exactly as produced.

use crate::{GoldenError, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SNAPSHOT_EXTENSION: &str = "snap";
const SEPARATOR: &str = "---";

/// A stored expected output
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// `category/name` of the test
    pub name: String,

    pub metadata: SnapshotMetadata,

    /// The emitted source
    pub content: String,
}

/// Metadata about a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotMetadata {
    /// When the snapshot was created
    pub created_at: String,

    /// When the snapshot was last updated
    pub updated_at: String,

    /// Description of what this tests
    pub description: Option<String>,
}

impl Snapshot {
    /// Render the on-disk form
    pub fn to_file_content(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# name: {}\n", self.name));
        if let Some(description) = &self.metadata.description {
            out.push_str(&format!("# description: {}\n", description));
        }
        out.push_str(&format!("# created: {}\n", self.metadata.created_at));
        out.push_str(&format!("# updated: {}\n", self.metadata.updated_at));
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&self.content);
        out
    }

    /// Parse the on-disk form; `name` is used when the header has none
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut snapshot = Snapshot {
            name: name.to_string(),
            metadata: SnapshotMetadata {
                created_at: String::new(),
                updated_at: String::new(),
                description: None,
            },
            content: String::new(),
        };

        let mut rest = text;
        loop {
            let (line, tail) = match rest.find('\n') {
                Some(end) => (&rest[..end], &rest[end + 1..]),
                None => {
                    return Err(GoldenError::CorpusError(format!(
                        "Snapshot '{}' has no '{}' separator",
                        name, SEPARATOR
                    )))
                }
            };
            rest = tail;

            let line = line.trim_end_matches('\r');
            if line == SEPARATOR {
                break;
            }

            let header = line.strip_prefix("# ").ok_or_else(|| {
                GoldenError::CorpusError(format!(
                    "Snapshot '{}' has a malformed header line: {:?}",
                    name, line
                ))
            })?;
            if let Some((key, value)) = header.split_once(": ") {
                match key {
                    "name" => snapshot.name = value.to_string(),
                    "description" => snapshot.metadata.description = Some(value.to_string()),
                    "created" => snapshot.metadata.created_at = value.to_string(),
                    "updated" => snapshot.metadata.updated_at = value.to_string(),
                    _ => {}
                }
            }
        }

        snapshot.content = normalize_source(rest);
        Ok(snapshot)
    }
}

/// Manages reading and writing snapshots
pub struct SnapshotManager {
    snapshot_dir: PathBuf,
}

impl SnapshotManager {
    pub fn new(snapshot_dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.as_ref().to_path_buf(),
        }
    }

    /// Load a snapshot from disk
    pub fn load(&self, name: &str) -> Result<Snapshot> {
        let path = self.snapshot_path(name);

        if !path.exists() {
            return Err(GoldenError::CorpusError(format!(
                "Snapshot '{}' not found at {:?}",
                name, path
            )));
        }

        let content = fs::read_to_string(&path)?;
        Snapshot::parse(name, &content)
    }

    /// Save a snapshot to disk
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(&snapshot.name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, snapshot.to_file_content())?;
        Ok(())
    }

    /// Replace the content of an existing snapshot
    pub fn update(&self, name: &str, new_content: &str) -> Result<()> {
        let mut snapshot = self.load(name)?;

        snapshot.content = normalize_source(new_content);
        snapshot.metadata.updated_at = Utc::now().to_rfc3339();

        self.save(&snapshot)
    }

    /// Create a new snapshot
    pub fn create(
        &self,
        name: &str,
        content: &str,
        description: Option<String>,
    ) -> Result<Snapshot> {
        let now = Utc::now().to_rfc3339();

        let snapshot = Snapshot {
            name: name.to_string(),
            metadata: SnapshotMetadata {
                created_at: now.clone(),
                updated_at: now,
                description,
            },
            content: normalize_source(content),
        };

        self.save(&snapshot)?;
        Ok(snapshot)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.snapshot_path(name).exists()
    }

    /// All snapshot names, as `category/name`, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut snapshots = Vec::new();

        if !self.snapshot_dir.exists() {
            return Ok(snapshots);
        }

        for entry in WalkDir::new(&self.snapshot_dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|s| s.to_str()) != Some(SNAPSHOT_EXTENSION)
            {
                continue;
            }

            if let Ok(relative) = path.strip_prefix(&self.snapshot_dir) {
                let name = relative.with_extension("");
                let name = name
                    .components()
                    .filter_map(|c| c.as_os_str().to_str())
                    .collect::<Vec<_>>()
                    .join("/");
                snapshots.push(name);
            }
        }

        snapshots.sort();
        Ok(snapshots)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.snapshot_path(name);

        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }

    /// Path of the snapshot called `name`
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        let suffix = format!(".{}", SNAPSHOT_EXTENSION);
        let filename = if name.ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{}{}", name, suffix)
        };

        self.snapshot_dir.join(filename)
    }

    /// Copy a snapshot aside before it is overwritten
    pub fn backup(&self, name: &str) -> Result<Option<PathBuf>> {
        let source = self.snapshot_path(name);

        if !source.exists() {
            return Ok(None);
        }

        let backup_path = source.with_extension(format!(
            "{}.backup.{}",
            SNAPSHOT_EXTENSION,
            Utc::now().timestamp()
        ));

        fs::copy(&source, &backup_path)?;
        Ok(Some(backup_path))
    }
}

/// Line endings normalized to `\n`
pub fn normalize_source(text: &str) -> String {
    text.replace("\r\n", "\n")
}
