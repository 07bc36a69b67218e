//! Component name scanner.
//!
//! Walks the source tree for files ending in the configured extension,
//! skipping any path with a component matching an exclude glob, and pulls
//! the string literal out of `this.name = '...'` declarations line by line.

use crate::error::{Result, SyncError};
use crate::fs::FileSystem;
use glob::Pattern;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name suffix of component sources.
pub const DEFAULT_EXTENSION: &str = ".ts";

/// Object whose `name` property declares the component name.
pub const DEFAULT_RECEIVER: &str = "this";

/// Matches `<receiver>.name = '<value>'` with single or double quotes.
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    pub fn new(receiver: &str) -> Result<Self> {
        let regex = Regex::new(&format!(
            r#"{}\.name\s*=\s*['"]([^'"]+)['"]"#,
            regex::escape(receiver)
        ))?;
        Ok(Self { regex })
    }

    /// Returns the first declared name on `line`, if any.
    pub fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Names declared by a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileNames {
    pub file: PathBuf,
    pub names: Vec<String>,
}

/// Compiles `--exclude` globs.
pub fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| SyncError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// Collects every file under `root` whose name ends with `extension`.
///
/// A file is skipped when any component of its path below `root` matches
/// one of `excludes`.
pub fn collect_source_files(
    fs: &impl FileSystem,
    root: &Path,
    extension: &str,
    excludes: &[Pattern],
) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs
        .list_files(root)?
        .into_iter()
        .filter(|path| has_extension(path, extension))
        .filter(|path| !is_excluded(path, root, excludes))
        .collect();
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(extension))
}

fn is_excluded(path: &Path, root: &Path, excludes: &[Pattern]) -> bool {
    if excludes.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .any(|c| excludes.iter().any(|p| p.matches(c)))
}

/// Extracts declared names from source text, at most one per line.
pub fn extract_names(source: &str, pattern: &NamePattern) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| pattern.find(line))
        .map(str::to_string)
        .collect()
}

/// Reads each file and extracts its declared names.
///
/// Any unreadable file aborts the scan.
pub fn scan_files(
    fs: &impl FileSystem,
    files: &[PathBuf],
    pattern: &NamePattern,
) -> Result<Vec<FileNames>> {
    files
        .iter()
        .map(|file| {
            let source = fs.read_to_string(file)?;
            let names = extract_names(&source, pattern);
            tracing::debug!(file = %file.display(), count = names.len(), "scanned");
            Ok(FileNames {
                file: file.clone(),
                names,
            })
        })
        .collect()
}

/// Reads each file and returns the deduplicated set of declared names.
pub fn discover_names(
    fs: &impl FileSystem,
    files: &[PathBuf],
    pattern: &NamePattern,
) -> Result<HashSet<String>> {
    Ok(scan_files(fs, files, pattern)?
        .into_iter()
        .flat_map(|f| f.names)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn this_pattern() -> NamePattern {
        NamePattern::new(DEFAULT_RECEIVER).unwrap()
    }

    #[test]
    fn extracts_single_quoted_name() {
        let source = r#"
            class Note implements INode {
                constructor() {
                    this.label = 'Note'
                    this.name = 'noteAnnotation'
                    this.version = 1.0
                }
            }
        "#;
        assert_eq!(extract_names(source, &this_pattern()), vec!["noteAnnotation"]);
    }

    #[test]
    fn extracts_double_quoted_name_without_spaces() {
        let source = r#"this.name="agentTool";"#;
        assert_eq!(extract_names(source, &this_pattern()), vec!["agentTool"]);
    }

    #[test]
    fn extracts_every_matching_line() {
        let source = "this.name = 'first'\nfoo()\nthis.name = 'second'\n";
        assert_eq!(
            extract_names(source, &this_pattern()),
            vec!["first", "second"]
        );
    }

    #[test]
    fn takes_only_first_match_per_line() {
        let source = "this.name = 'a'; this.name = 'b'";
        assert_eq!(extract_names(source, &this_pattern()), vec!["a"]);
    }

    #[test]
    fn ignores_comparisons_and_other_properties() {
        let source = r#"
            if (this.name == 'x') {}
            this.names = 'plural'
            this.label = 'Label'
            const name = 'local'
            this.name = ''
        "#;
        assert!(extract_names(source, &this_pattern()).is_empty());
    }

    #[test]
    fn honours_custom_receiver() {
        let pattern = NamePattern::new("node").unwrap();
        let source = "node.name = 'custom'\nthis.name = 'ignored'";
        assert_eq!(extract_names(source, &pattern), vec!["custom"]);
    }

    #[test]
    fn receiver_is_matched_literally() {
        let pattern = NamePattern::new("a.b").unwrap();
        assert_eq!(pattern.find("a.b.name = 'x'"), Some("x"));
        assert_eq!(pattern.find("axb.name = 'x'"), None);
    }

    #[test]
    fn collects_only_matching_extension() {
        let fs = MemoryFileSystem::new()
            .with_file("nodes/a/A.ts", "")
            .with_file("nodes/a/A.js", "")
            .with_file("nodes/b/icon.svg", "")
            .with_file("nodes/b/B.ts", "");
        let files = collect_source_files(&fs, Path::new("nodes"), ".ts", &[]).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("nodes/a/A.ts"), PathBuf::from("nodes/b/B.ts")]
        );
    }

    #[test]
    fn excludes_matching_path_components() {
        let fs = MemoryFileSystem::new()
            .with_file("nodes/keep/A.ts", "")
            .with_file("nodes/node_modules/dep/B.ts", "")
            .with_file("nodes/keep/C.test.ts", "");
        let excludes =
            compile_excludes(&["node_modules".to_string(), "*.test.ts".to_string()]).unwrap();
        let files = collect_source_files(&fs, Path::new("nodes"), ".ts", &excludes).unwrap();
        assert_eq!(files, vec![PathBuf::from("nodes/keep/A.ts")]);
    }

    #[test]
    fn exclude_does_not_apply_above_root() {
        let fs = MemoryFileSystem::new().with_file("build/nodes/A.ts", "");
        let excludes = compile_excludes(&["build".to_string()]).unwrap();
        let files =
            collect_source_files(&fs, Path::new("build/nodes"), ".ts", &excludes).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn rejects_invalid_exclude_glob() {
        let err = compile_excludes(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, SyncError::Pattern { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn discover_names_deduplicates_across_files() {
        let fs = MemoryFileSystem::new()
            .with_file("nodes/A.ts", "this.name = 'alpha'")
            .with_file("nodes/B.ts", "this.name = 'alpha'\nthis.name = 'beta'");
        let files = collect_source_files(&fs, Path::new("nodes"), ".ts", &[]).unwrap();
        let names = discover_names(&fs, &files, &this_pattern()).unwrap();
        let expected: HashSet<String> = ["alpha", "beta"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn unreadable_file_fails_the_scan() {
        let fs = MemoryFileSystem::new()
            .with_file("nodes/A.ts", "this.name = 'alpha'")
            .with_bytes("nodes/B.ts", &[0xc3, 0x28]);
        let files = collect_source_files(&fs, Path::new("nodes"), ".ts", &[]).unwrap();
        let err = discover_names(&fs, &files, &this_pattern()).unwrap_err();
        assert!(matches!(err, SyncError::Read { ref path, .. } if path == Path::new("nodes/B.ts")));
    }
}
