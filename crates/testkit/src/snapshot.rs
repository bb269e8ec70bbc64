//! Golden-file snapshots for headless runs.
//!
//! JSON snapshots are written as pretty JSON with object keys sorted, so field
//! order in Rust types never shows up as a diff. Text snapshots are compared
//! verbatim after normalizing line endings.
//!
//! Set `BLOCKSTACK_UPDATE_SNAPSHOTS=1` to (re)write goldens instead of
//! comparing against them.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "BLOCKSTACK_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the JSON snapshot stored at `path`.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let actual = canonical_json(value)?;
    compare_or_update(path.as_ref(), &actual)
}

/// Assert that `text` matches the text snapshot stored at `path`.
pub fn assert_text_snapshot<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let mut actual = text.replace("\r\n", "\n");
    if !actual.ends_with('\n') {
        actual.push('\n');
    }
    compare_or_update(path.as_ref(), &actual)
}

/// Render `value` as canonical snapshot JSON.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut out =
        serde_json::to_string_pretty(&sort_keys(value)).context("Failed to format snapshot")?;
    out.push('\n');
    Ok(out)
}

fn compare_or_update(path: &Path, actual: &str) -> Result<()> {
    if update_requested() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create snapshot directory {}", parent.display())
            })?;
        }
        return fs::write(path, actual)
            .with_context(|| format!("Failed to write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path)
        .with_context(|| {
            format!(
                "Snapshot missing at {} (run with {}=1 to create it)",
                path.display(),
                UPDATE_SNAPSHOTS_ENV
            )
        })?
        .replace("\r\n", "\n");

    if let Some((line, want, got)) = first_difference(&expected, actual) {
        anyhow::bail!(
            "Snapshot mismatch at {} line {}:\n  expected: {}\n  actual:   {}\n(run with {}=1 to update)",
            path.display(),
            line,
            want,
            got,
            UPDATE_SNAPSHOTS_ENV
        );
    }
    Ok(())
}

fn update_requested() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// 1-based line number and contents of the first differing line.
fn first_difference<'a>(expected: &'a str, actual: &'a str) -> Option<(usize, &'a str, &'a str)> {
    let mut want = expected.lines();
    let mut got = actual.lines();
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (None, None) => return None,
            (w, g) if w == g => line += 1,
            (w, g) => return Some((line, w.unwrap_or("<end>"), g.unwrap_or("<end>"))),
        }
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
