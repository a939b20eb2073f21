//! Follow record loading from Parquet and CSV files

use std::collections::HashMap;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use polars::prelude::*;
use crate::graph::FollowRecord;

/// Where and how to read follow records
#[derive(Debug, Clone)]
pub struct EdgeSource {
    /// Column holding the following account
    pub source_column: String,

    /// Column holding the followed account
    pub target_column: String,

    /// Keep at most this many records per source account
    pub max_edges_per_source: Option<usize>,
}

impl Default for EdgeSource {
    fn default() -> Self {
        Self {
            source_column: "source_id".to_string(),
            target_column: "target_id".to_string(),
            max_edges_per_source: None,
        }
    }
}

/// Load follow records from a `.parquet` or `.csv` file
pub fn load_follow_records(path: &Path, source: &EdgeSource) -> Result<Vec<FollowRecord>> {
    log::info!("Reading follow records from {}", path.display());

    // Check if the file exists
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let frame = match extension.as_deref() {
        Some("parquet") => LazyFrame::scan_parquet(path, Default::default())?,
        Some("csv") => LazyCsvReader::new(path).with_has_header(true).finish()?,
        _ => return Err(anyhow!("Unsupported input format: {}", path.display())),
    };

    // Identifiers are opaque strings, whatever type the file stores them as
    let df = frame
        .select([
            col(source.source_column.as_str()).cast(DataType::String),
            col(source.target_column.as_str()).cast(DataType::String),
        ])
        .collect()
        .with_context(|| format!("Failed to read columns from {}", path.display()))?;

    log::debug!("File schema: {:?}", df.schema());

    let src_col = df.column(source.source_column.as_str())?.str()?;
    let dst_col = df.column(source.target_column.as_str())?.str()?;

    let mut records = Vec::with_capacity(df.height());
    let mut per_source: HashMap<&str, usize> = HashMap::new();
    let mut capped = 0usize;

    for (src, dst) in src_col.into_iter().zip(dst_col.into_iter()) {
        let (Some(src), Some(dst)) = (src, dst) else {
            continue;
        };

        if let Some(limit) = source.max_edges_per_source {
            let seen = per_source.entry(src).or_insert(0);
            if *seen >= limit {
                capped += 1;
                continue;
            }
            *seen += 1;
        }

        records.push(FollowRecord::new(src, dst));
    }

    if capped > 0 {
        log::info!("Dropped {} records over the per-source limit", capped);
    }
    log::info!("Loaded {} follow records", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("follows.csv")).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        dir
    }

    #[test]
    fn test_load_csv_records() {
        let dir = write_csv("source_id,target_id\nalice,bob\nbob,carol\n");
        let records =
            load_follow_records(&dir.path().join("follows.csv"), &EdgeSource::default()).unwrap();

        assert_eq!(
            records,
            vec![FollowRecord::new("alice", "bob"), FollowRecord::new("bob", "carol")]
        );
    }

    #[test]
    fn test_numeric_ids_and_custom_columns() {
        let dir = write_csv("Fid,TargetFid\n1,2\n1,3\n1,4\n2,3\n");
        let source = EdgeSource {
            source_column: "Fid".to_string(),
            target_column: "TargetFid".to_string(),
            max_edges_per_source: Some(2),
        };

        let records = load_follow_records(&dir.path().join("follows.csv"), &source).unwrap();

        assert_eq!(
            records,
            vec![
                FollowRecord::new("1", "2"),
                FollowRecord::new("1", "3"),
                FollowRecord::new("2", "3"),
            ]
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_follow_records(Path::new("/nonexistent/follows.csv"), &EdgeSource::default())
            .unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("follows.txt");
        std::fs::write(&path, "a b\n").unwrap();

        assert!(load_follow_records(&path, &EdgeSource::default()).is_err());
    }
}
