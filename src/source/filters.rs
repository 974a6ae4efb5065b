//! Which parts of a source tree make it into the document.
//!
//! Two fixed lists decide this: directory names that are never descended into
//! (version control metadata, dependency caches, build output, IDE state) and
//! the file extensions that count as source code. User-supplied globs can
//! exclude more, matched against the path relative to the tree root.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsStr;
use std::path::Path;

/// Directory names pruned at every level of the walk
pub const EXCLUDED_DIRECTORIES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "__pycache__",
    "node_modules",
    "venv",
    "env",
    ".env",
    "dist",
    "build",
    ".idea",
    ".vscode",
    "target",
    "bin",
    "obj",
    ".next",
    "coverage",
];

/// Lower-case file extensions (without the dot) treated as source code
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[
    // programming languages
    "py", "java", "cpp", "c", "h", "hpp", "cs", "js", "ts", "jsx", "tsx", "go", "rs", "rb",
    "php", "swift", "kt", "scala", "m", "mm", "sql", "sh", "bash", "pl", "r", "lua", "vim",
    "asm", "s", "f", "f90", "pas", "vb",
    // markup and styling
    "xml", "html", "css", "md", "txt",
    // configuration
    "json", "yaml", "yml", "toml", "conf", "cfg", "ini", "properties",
];

pub fn is_excluded_directory(name: &OsStr) -> bool {
    name.to_str()
        .map(|name| EXCLUDED_DIRECTORIES.contains(&name))
        .unwrap_or(false)
}

/// Only the final extension counts, compared case-insensitively. Dot-files such
/// as `.bashrc` have no extension and are never recognized.
pub fn has_recognized_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| RECOGNIZED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// User-supplied exclusion globs, matched against root-relative paths.
#[derive(Clone, Debug)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    globs: GlobSet,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        ExclusionSet {
            patterns: Vec::default(),
            globs: GlobSet::empty(),
        }
    }
}

impl ExclusionSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<ExclusionSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern)
                .with_context(|| format!("Invalid exclusion glob: {pattern}"))?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .with_context(|| "Failed to compile exclusion globs")?;

        Ok(ExclusionSet {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            globs,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        !self.patterns.is_empty() && self.globs.is_match(relative_path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recognizes_extensions_case_insensitively() {
        assert!(has_recognized_extension(Path::new("src/main.rs")));
        assert!(has_recognized_extension(Path::new("Main.JAVA")));
        assert!(has_recognized_extension(Path::new("a/b/config.Yml")));
        assert!(has_recognized_extension(Path::new("archive.tar.json")));
    }

    #[test]
    fn rejects_unknown_and_missing_extensions() {
        assert!(!has_recognized_extension(Path::new("blob.bin")));
        assert!(!has_recognized_extension(Path::new("Makefile")));
        assert!(!has_recognized_extension(Path::new(".bashrc")));
        assert!(!has_recognized_extension(Path::new("trailing.")));
        assert!(!has_recognized_extension(Path::new("main.rs.bak")));
    }

    #[test]
    fn excludes_tooling_directories_by_exact_name() {
        assert!(is_excluded_directory(OsStr::new(".git")));
        assert!(is_excluded_directory(OsStr::new("node_modules")));
        assert!(!is_excluded_directory(OsStr::new("src")));
        assert!(!is_excluded_directory(OsStr::new("Build")));
        assert!(!is_excluded_directory(OsStr::new("builder")));
    }

    #[test]
    fn exclusion_globs_match_relative_paths() {
        let set = ExclusionSet::new(&["generated/**", "*.min.js"]).expect("can build globs");
        assert!(set.is_excluded(Path::new("generated/api.rs")));
        assert!(set.is_excluded(Path::new("static/vendor.min.js")));
        assert!(!set.is_excluded(Path::new("src/generated.rs")));
        assert_eq!(set.patterns().len(), 2);
    }

    #[test]
    fn empty_exclusion_set_excludes_nothing() {
        let set = ExclusionSet::default();
        assert!(!set.is_excluded(Path::new("anything.rs")));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        assert!(ExclusionSet::new(&["a/[b"]).is_err());
    }
}
