//! Whitelist serialization.
//!
//! Renders entries back into the generated module format and writes the
//! result over the whitelist file. The declared identifier and export line
//! are fixed.

use crate::error::Result;
use crate::fs::FileSystem;
use crate::whitelist::Entry;
use std::fmt::Write;
use std::path::Path;

/// Identifier declared and exported by the generated module.
pub const LIST_IDENTIFIER: &str = "whitelistNodes";

/// Prefix written before a disabled entry.
pub const DISABLED_PREFIX: &str = "// ";

const INDENT: &str = "    ";

/// Renders entries, in the given order, as the whitelist module.
pub fn render(entries: &[Entry]) -> String {
    let mut out = format!("const {LIST_IDENTIFIER} = [\n");
    for entry in entries {
        let prefix = if entry.disabled { DISABLED_PREFIX } else { "" };
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{INDENT}{prefix}'{}',", entry.name);
    }
    out.push_str("]\n\n");
    let _ = writeln!(out, "export default {LIST_IDENTIFIER}");
    out
}

/// Renders `entries` and replaces the contents of `path` with them.
pub fn write_whitelist(fs: &impl FileSystem, path: &Path, entries: &[Entry]) -> Result<()> {
    fs.write(path, &render(entries))
}
