use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Parse line-oriented `abbreviation=expansion` records. Blank lines and
/// `#` comments are ignored; lines without a separator are skipped rather
/// than failing the whole load. Keys are lowercased and trimmed, values are
/// trimmed but case-preserved. The last entry wins on duplicate keys.
pub fn parse_dictionary(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        entries.insert(key, value.trim().to_string());
    }
    entries
}

/// Load the dictionary file. A missing file is not fatal: the daemon runs
/// with an empty mapping and simply never matches. Any other read failure
/// is returned so the caller can keep its previous mapping.
pub fn load_dictionary(path: &Path) -> Result<HashMap<String, String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_dictionary(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("dictionary file not found at {}", path.display());
            Ok(HashMap::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the dictionary for a fresh start, where there is no previous
/// mapping to retain: any read failure degrades to an empty mapping with a
/// warning instead of refusing to start.
pub fn load_dictionary_or_empty(path: &Path) -> HashMap<String, String> {
    match load_dictionary(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "failed to read dictionary at {}, starting with empty mapping: {}",
                path.display(),
                e
            );
            HashMap::new()
        }
    }
}

/// Shared handle to the current dictionary snapshot.
///
/// The mapping itself is immutable once built; reload builds a fresh map and
/// swaps the `Arc` pointer under a write lock held only for the swap. The
/// matcher clones the `Arc` per event and reads without any lock, so it can
/// never observe a partially populated mapping — at worst one event matches
/// against a stale-but-complete snapshot.
#[derive(Clone)]
pub struct DictionaryHandle {
    inner: Arc<RwLock<Arc<HashMap<String, String>>>>,
}

impl DictionaryHandle {
    pub fn new(entries: HashMap<String, String>) -> Self {
        DictionaryHandle {
            inner: Arc::new(RwLock::new(Arc::new(entries))),
        }
    }

    /// Clone out the current snapshot.
    pub fn snapshot(&self) -> Arc<HashMap<String, String>> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the current snapshot wholesale.
    pub fn swap(&self, entries: HashMap<String, String>) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(entries);
    }

    /// Reload from the dictionary file, swapping in the new mapping only on
    /// a successful load. On I/O failure the previous snapshot is retained.
    pub fn reload(&self, path: &Path) -> Result<usize> {
        let entries = load_dictionary(path)?;
        let count = entries.len();
        self.swap(entries);
        Ok(count)
    }

    pub fn entry_count(&self) -> usize {
        self.snapshot().len()
    }
}

/// Add an abbreviation to the dictionary file, replacing the value in place
/// if the key already exists. Comments and unrelated lines are preserved.
pub fn add_entry(path: &Path, abbreviation: &str, expansion: &str) -> Result<()> {
    use crate::error::TexpandError;

    let key = abbreviation.trim().to_lowercase();
    if key.is_empty() || key.contains('=') {
        return Err(TexpandError::Dictionary(format!(
            "invalid abbreviation '{}'",
            abbreviation
        )));
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;
    for line in content.lines() {
        if entry_key(line).as_deref() == Some(key.as_str()) {
            lines.push(format!("{}={}", key, expansion.trim()));
            replaced = true;
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(format!("{}={}", key, expansion.trim()));
    }

    fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}

/// Remove an abbreviation from the dictionary file. Returns whether any
/// entry was removed.
pub fn remove_entry(path: &Path, abbreviation: &str) -> Result<bool> {
    let key = abbreviation.trim().to_lowercase();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    let mut lines: Vec<String> = Vec::new();
    let mut removed = false;
    for line in content.lines() {
        if entry_key(line).as_deref() == Some(key.as_str()) {
            removed = true;
        } else {
            lines.push(line.to_string());
        }
    }

    if removed {
        fs::write(path, lines.join("\n") + "\n")?;
    }
    Ok(removed)
}

/// List dictionary entries in file order.
pub fn list_entries(path: &Path) -> Result<Vec<(String, String)>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_lowercase();
            if !key.is_empty() {
                entries.push((key, value.trim().to_string()));
            }
        }
    }
    Ok(entries)
}

fn entry_key(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, _) = line.split_once('=')?;
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_simple_entries() {
        let dict = parse_dictionary("brb=be right back\nomw=on my way\n");
        assert_eq!(dict.len(), 2);
        assert_eq!(dict["brb"], "be right back");
        assert_eq!(dict["omw"], "on my way");
    }

    #[test]
    fn skips_comments_blanks_and_malformed_lines() {
        let dict = parse_dictionary("# comment\n\nnodelimiterhere\nbrb=be right back\n");
        assert_eq!(dict.len(), 1);
        assert_eq!(dict["brb"], "be right back");
    }

    #[test]
    fn first_equals_splits_value_keeps_rest() {
        let dict = parse_dictionary("eq=a=b=c\n");
        assert_eq!(dict["eq"], "a=b=c");
    }

    #[test]
    fn keys_lowercased_values_case_preserved() {
        let dict = parse_dictionary("  BRB  =  Be Right Back  \n");
        assert_eq!(dict["brb"], "Be Right Back");
    }

    #[test]
    fn last_duplicate_wins() {
        let dict = parse_dictionary("brb=first\nbrb=second\n");
        assert_eq!(dict["brb"], "second");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dict = load_dictionary(Path::new("/nonexistent/texpand-dictionary.txt")).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn unreadable_file_degrades_to_empty_on_fresh_start() {
        // A directory fails the read with something other than NotFound;
        // load_dictionary reports it, the fresh-start path absorbs it.
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dictionary(dir.path()).is_err());
        assert!(load_dictionary_or_empty(dir.path()).is_empty());
    }

    #[test]
    fn reload_of_unchanged_file_is_idempotent() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "brb=be right back\nomw=on my way").unwrap();

        let handle = DictionaryHandle::new(load_dictionary(file.path()).unwrap());
        let before = handle.snapshot();
        handle.reload(file.path()).unwrap();
        let after = handle.snapshot();
        assert_eq!(*before, *after);
    }

    #[test]
    fn reload_swaps_in_new_entries() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "brb=be right back").unwrap();

        let handle = DictionaryHandle::new(load_dictionary(file.path()).unwrap());
        assert_eq!(handle.entry_count(), 1);

        writeln!(file, "omw=on my way").unwrap();
        file.flush().unwrap();
        let count = handle.reload(file.path()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(handle.snapshot()["omw"], "on my way");
    }

    #[test]
    fn readers_hold_snapshot_across_swap() {
        let handle = DictionaryHandle::new(parse_dictionary("brb=be right back"));
        let old = handle.snapshot();
        handle.swap(HashMap::new());
        assert_eq!(old["brb"], "be right back");
        assert_eq!(handle.entry_count(), 0);
    }

    #[test]
    fn add_entry_appends_and_replaces() {
        let file = NamedTempFile::new().unwrap();
        add_entry(file.path(), "BRB", "be right back").unwrap();
        add_entry(file.path(), "omw", "on my way").unwrap();
        add_entry(file.path(), "brb", "be right back!").unwrap();

        let entries = list_entries(file.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                ("brb".to_string(), "be right back!".to_string()),
                ("omw".to_string(), "on my way".to_string()),
            ]
        );
    }

    #[test]
    fn add_entry_preserves_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# my abbreviations\nbrb=be right back").unwrap();
        add_entry(file.path(), "omw", "on my way").unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("# my abbreviations\n"));
    }

    #[test]
    fn remove_entry_deletes_matching_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "brb=be right back\nomw=on my way").unwrap();

        assert!(remove_entry(file.path(), "brb").unwrap());
        assert!(!remove_entry(file.path(), "brb").unwrap());

        let entries = list_entries(file.path()).unwrap();
        assert_eq!(entries, vec![("omw".to_string(), "on my way".to_string())]);
    }

    #[test]
    fn remove_entry_on_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");
        assert!(!remove_entry(&path, "brb").unwrap());
    }

    #[test]
    fn add_entry_rejects_invalid_abbreviation() {
        let file = NamedTempFile::new().unwrap();
        assert!(add_entry(file.path(), "", "x").is_err());
        assert!(add_entry(file.path(), "a=b", "x").is_err());
    }
}
