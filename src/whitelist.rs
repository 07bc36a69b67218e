//! Whitelist file parsing.
//!
//! The whitelist is a generated module holding one quoted name per line.
//! A leading `//` marks the entry as disabled. Every line that does not
//! carry a quoted name (the declaration header, the closing bracket, the
//! export) is skipped.

use crate::error::{Result, SyncError};
use crate::fs::FileSystem;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

const ENTRY_PATTERN: &str = r#"(//)?\s*["']([^"']+)["']\s*,?"#;

/// One name in the whitelist and whether it is commented out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub disabled: bool,
}

impl Entry {
    pub fn enabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disabled: false,
        }
    }

    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disabled: true,
        }
    }
}

/// Entries read from an existing whitelist, in file order.
#[derive(Debug, Default, Clone)]
pub struct Whitelist {
    entries: Vec<Entry>,
    names: HashSet<String>,
    source: String,
}

impl Whitelist {
    /// Parses whitelist content.
    ///
    /// When a name appears more than once, the first occurrence wins so the
    /// earliest review decision is kept.
    pub fn parse(content: &str) -> Result<Self> {
        let pattern = Regex::new(ENTRY_PATTERN)?;
        let mut whitelist = Self {
            source: content.to_string(),
            ..Self::default()
        };

        for (idx, line) in content.lines().enumerate() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let Some(name) = caps.get(2) else {
                continue;
            };
            let entry = Entry {
                name: name.as_str().to_string(),
                disabled: caps.get(1).is_some(),
            };
            if !whitelist.push(entry) {
                tracing::debug!(
                    line = idx + 1,
                    name = name.as_str(),
                    "duplicate whitelist entry dropped"
                );
            }
        }

        Ok(whitelist)
    }

    /// Reads and parses the whitelist at `path`. The file must already exist.
    pub fn load(fs: &impl FileSystem, path: &Path) -> Result<Self> {
        if !fs.is_file(path) {
            return Err(SyncError::MissingWhitelist(path.to_path_buf()));
        }
        Self::parse(&fs.read_to_string(path)?)
    }

    /// Appends `entry` unless its name is already present.
    fn push(&mut self, entry: Entry) -> bool {
        if !self.names.insert(entry.name.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The text this whitelist was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    #[test]
    fn parses_enabled_and_disabled_entries() {
        let content = "\
const whitelistNodes = [
    'alpha',
    // 'beta',
    'gamma',
]

export default whitelistNodes
";
        let whitelist = Whitelist::parse(content).unwrap();
        assert_eq!(
            whitelist.entries(),
            &[
                Entry::enabled("alpha"),
                Entry::disabled("beta"),
                Entry::enabled("gamma"),
            ]
        );
    }

    #[test]
    fn accepts_double_quotes_and_missing_comma() {
        let content = "    \"alpha\"\n    //\"beta\"";
        let whitelist = Whitelist::parse(content).unwrap();
        assert_eq!(
            whitelist.entries(),
            &[Entry::enabled("alpha"), Entry::disabled("beta")]
        );
    }

    #[test]
    fn empty_content_yields_no_entries() {
        let whitelist = Whitelist::parse("").unwrap();
        assert!(whitelist.is_empty());
    }

    #[test]
    fn boilerplate_only_yields_no_entries() {
        let content = "const whitelistNodes = [\n]\n\nexport default whitelistNodes\n";
        assert!(Whitelist::parse(content).unwrap().is_empty());
    }

    #[test]
    fn first_duplicate_wins() {
        let content = "    // 'alpha',\n    'alpha',\n    'beta',\n";
        let whitelist = Whitelist::parse(content).unwrap();
        assert_eq!(
            whitelist.entries(),
            &[Entry::disabled("alpha"), Entry::enabled("beta")]
        );
    }

    #[test]
    fn duplicates_are_case_sensitive() {
        let content = "'Alpha',\n'alpha',\n";
        let whitelist = Whitelist::parse(content).unwrap();
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.contains("Alpha"));
        assert!(whitelist.contains("alpha"));
        assert!(!whitelist.contains("ALPHA"));
    }

    #[test]
    fn load_requires_existing_file() {
        let fs = MemoryFileSystem::new().with_dir("utils");
        let err = Whitelist::load(&fs, Path::new("utils/whitelistNodes.ts")).unwrap_err();
        assert!(matches!(err, SyncError::MissingWhitelist(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn load_reads_from_file_system() {
        let fs = MemoryFileSystem::new().with_file("list.ts", "    // 'x',\n");
        let whitelist = Whitelist::load(&fs, Path::new("list.ts")).unwrap();
        assert_eq!(whitelist.source(), "    // 'x',\n");
        assert_eq!(whitelist.entries(), &[Entry::disabled("x")]);
    }
}
