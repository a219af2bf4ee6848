// src/extract/mod.rs
use anyhow::{Context, Result};
use serde_json::Value;
use std::{fs, path::Path};
use tracing::debug;

/// Read a JSON export and return its draw records.
///
/// The export is either a bare array of records or an object wrapping one:
/// for an object, the first array-valued member (in source order) wins, and
/// an object with no array member is treated as a single record. Any other
/// top-level shape yields no records.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read input file {:?}", path.as_ref()))?;
    let data: Value = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in {:?}", path.as_ref()))?;

    let records = match data {
        Value::Array(items) => items,
        Value::Object(map) => {
            if map.values().any(Value::is_array) {
                map.into_iter()
                    .find_map(|(_, v)| match v {
                        Value::Array(items) => Some(items),
                        _ => None,
                    })
                    .unwrap_or_default()
            } else {
                vec![Value::Object(map)]
            }
        }
        _ => Vec::new(),
    };

    debug!(count = records.len(), "records extracted");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fixture(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn bare_array_is_returned_as_is() -> Result<()> {
        let tmp = write_fixture(r#"[{"concurso": 1}, {"concurso": 2}]"#);
        let records = read_records(tmp.path())?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["concurso"], 1);
        Ok(())
    }

    #[test]
    fn wrapping_object_yields_first_array_member() -> Result<()> {
        let tmp = write_fixture(r#"{"meta": "x", "items": [{"concurso": 7}], "other": [1, 2, 3]}"#);
        let records = read_records(tmp.path())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["concurso"], 7);
        Ok(())
    }

    #[test]
    fn object_without_array_member_is_a_single_record() -> Result<()> {
        let tmp = write_fixture(r#"{"concurso": 42, "local": "Sao Paulo"}"#);
        let records = read_records(tmp.path())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["concurso"], 42);
        Ok(())
    }

    #[test]
    fn scalar_top_level_yields_nothing() -> Result<()> {
        let tmp = write_fixture("123");
        assert!(read_records(tmp.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_json_is_fatal() {
        let tmp = write_fixture("{not json");
        assert!(read_records(tmp.path()).is_err());
    }

    #[test]
    fn missing_file_is_fatal() {
        assert!(read_records("/no/such/file.json").is_err());
    }
}
