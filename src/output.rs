use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Pretty-print `value` as JSON to `file`, or to stdout when no file is given.
pub fn emit_json<T: Serialize>(value: &T, file: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match file {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("writing output to {}", path.display()))?;
            tracing::info!("wrote output to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn writes_pretty_json_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        emit_json(&json!([{"name": "A"}]), Some(&path)).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[\n  {\n    \"name\": \"A\"\n  }\n]\n");
    }
}
