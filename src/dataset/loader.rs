//! @ai:module:intent JSONL loader for benchmark splits
//! @ai:module:layer infrastructure
//! @ai:module:public_api Dataset, SchemaRecord
//! @ai:module:stateless true

use crate::dataset::Task;
use crate::types::Schema;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent One line of a split export, hub column names
#[derive(Debug, Deserialize)]
struct RawRecord {
    unique_id: String,
    /// Stringified schema, exactly as the hub stores it.
    json_schema: String,
}

/// @ai:intent A schema with its unique id within the task
#[derive(Debug, Clone)]
pub struct SchemaRecord {
    pub unique_id: String,
    pub schema: Schema,
}

/// @ai:intent In-memory view of one benchmark split
pub struct Dataset {
    task: Task,
    records: Vec<SchemaRecord>,
}

impl Dataset {
    /// @ai:intent Load `<dataset_dir>/<task>.jsonl`
    ///
    /// Lines that fail to parse and duplicated unique_ids are skipped with a
    /// warning; the rest of the split still loads.
    /// @ai:effects fs:read
    pub fn load(dataset_dir: &Path, task: Task) -> Result<Self> {
        let path = dataset_dir.join(format!("{}.jsonl", task.as_str()));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

        let mut records = Vec::new();
        let mut seen_ids = HashSet::new();

        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let raw: RawRecord = match serde_json::from_str(line) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(
                        "Skipping invalid record at {}:{}: {}",
                        path.display(),
                        lineno + 1,
                        e
                    );
                    continue;
                }
            };

            let schema: Schema = match serde_json::from_str(&raw.json_schema) {
                Ok(schema) => schema,
                Err(e) => {
                    tracing::warn!(
                        "Skipping record '{}' with unparseable schema: {}",
                        raw.unique_id,
                        e
                    );
                    continue;
                }
            };

            if !seen_ids.insert(raw.unique_id.clone()) {
                tracing::warn!("Skipping duplicate unique_id '{}' in {}", raw.unique_id, task);
                continue;
            }

            records.push(SchemaRecord {
                unique_id: raw.unique_id,
                schema,
            });
        }

        Ok(Self { task, records })
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// @ai:intent Iterate records, honoring an optional limit cutoff
    /// @ai:effects pure
    pub fn iter(&self, limit: Option<usize>) -> impl Iterator<Item = &SchemaRecord> {
        self.records.iter().take(limit.unwrap_or(usize::MAX))
    }
}

/// @ai:intent List split files present in a dataset directory
/// @ai:effects fs:read
pub fn available_splits(dataset_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dataset_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "jsonl")
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}
