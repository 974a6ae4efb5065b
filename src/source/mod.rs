//! Gathering a source tree into one flat, ordered sequence of lines.
//!
//! The walk is deterministic: entries are visited in file-name order at every
//! level and the kept files are sorted by path once more at the end, so the
//! output never depends on how the file system happens to iterate a directory.
//! Every kept file contributes a `// File: <path>` marker, a blank line, its
//! content and a trailing blank separator.

mod encoding;
pub use encoding::*;

mod filters;
pub use filters::*;

use ignore::WalkBuilder;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// Fatal collection failures. Problems with individual files are not errors;
/// they are logged and the file is skipped.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Source directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Source path {} isn't a directory!", .0.display())]
    NotADirectory(PathBuf),
    #[error("No source code files found in {}", .0.display())]
    EmptyCorpus(PathBuf),
}

/// A file discovered while walking the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Path relative to the tree root, used for the file marker
    pub relative: PathBuf,
    pub recognized: bool,
}

impl FileEntry {
    /// The relative path with `/` separators regardless of platform
    pub fn display_path(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// A file that was recognized but could not be turned into lines
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub relative: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Candidate encodings, tried in order
    pub encodings: Vec<TextEncoding>,
    pub exclude: ExclusionSet,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            encodings: TextEncoding::defaults().to_vec(),
            exclude: ExclusionSet::default(),
        }
    }
}

/// The whole corpus as lines, in output order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<String>,
    files: Vec<PathBuf>,
}

impl LineSequence {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Relative paths of the files that contributed lines, in order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn push_file(&mut self, entry: &FileEntry, contents: &str) {
        self.lines.push(format!("// File: {}", entry.display_path()));
        self.lines.push(String::new());

        // text-mode reads see every line ending as '\n'
        let contents = contents.replace("\r\n", "\n").replace('\r', "\n");
        self.lines.extend(contents.split('\n').map(ToString::to_string));

        self.lines.push(String::new());
        self.files.push(entry.relative.clone());
    }
}

#[cfg(test)]
impl From<Vec<String>> for LineSequence {
    fn from(lines: Vec<String>) -> Self {
        LineSequence {
            lines,
            files: Vec::default(),
        }
    }
}

/// Everything the collector produced, including the files it had to skip
#[derive(Debug)]
pub struct Collection {
    pub sequence: LineSequence,
    pub skipped: Vec<SkippedFile>,
}

/// Walk `root` and list every file not pruned by the exclusion rules, sorted by
/// path. Unrecognized files are returned too, flagged as such.
pub fn discover(root: &Path, options: &CollectOptions) -> Result<Vec<FileEntry>, CollectError> {
    if !root.exists() {
        return Err(CollectError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CollectError::NotADirectory(root.to_path_buf()));
    }

    let filter_root = root.to_path_buf();
    let exclude = options.exclude.clone();

    let mut walk = WalkBuilder::new(root);
    walk.standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            // the root itself is always walked, whatever it is called
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir && is_excluded_directory(entry.file_name()) {
                return false;
            }
            match entry.path().strip_prefix(&filter_root) {
                Ok(relative) => !exclude.is_excluded(relative),
                Err(_) => true,
            }
        });

    let mut files: Vec<FileEntry> = Vec::default();
    for entry in walk.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to walk part of the source tree: {e}");
                continue;
            }
        };

        // symlinks to directories aren't descended into; every other entry,
        // including a dangling link, is listed and fails later when read
        let path = entry.into_path();
        if path.is_dir() {
            continue;
        }

        let relative = match path.strip_prefix(root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };
        let recognized = has_recognized_extension(&path);
        files.push(FileEntry {
            path,
            relative,
            recognized,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Read the recognized files among `files`, in the order given, into a single
/// line sequence. Files that can't be read or decoded are skipped with a warning.
pub fn read_files(
    files: &[FileEntry],
    options: &CollectOptions,
    progress: &ProgressBar,
) -> Collection {
    let mut sequence = LineSequence::default();
    let mut skipped: Vec<SkippedFile> = Vec::default();

    for entry in files.iter().filter(|entry| entry.recognized) {
        progress.inc(1);
        progress.set_message(entry.display_path());

        let bytes = match std::fs::read(&entry.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                progress.suspend(|| {
                    log::warn!("Error reading {}: {e}, skipping...", entry.path.display())
                });
                skipped.push(SkippedFile {
                    relative: entry.relative.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match decode_first(&bytes, &options.encodings) {
            Some((contents, encoding)) => {
                log::debug!("Decoded {} as {encoding}", entry.display_path());
                sequence.push_file(entry, &contents);
            }
            None => {
                progress.suspend(|| {
                    log::warn!(
                        "Could not read file {} with any of the candidate encodings, skipping...",
                        entry.path.display()
                    )
                });
                skipped.push(SkippedFile {
                    relative: entry.relative.clone(),
                    reason: "no candidate encoding could decode the file".to_string(),
                });
            }
        }
    }

    Collection { sequence, skipped }
}

/// Discover and read a source tree in one step.
///
/// Fails if `root` is missing or holds no recognized file at all.
pub fn collect(
    root: &Path,
    options: &CollectOptions,
    progress: &ProgressBar,
) -> Result<Collection, CollectError> {
    if !options.exclude.patterns().is_empty() {
        log::debug!("Excluding globs: {}", options.exclude.patterns().join(", "));
    }
    let files = discover(root, options)?;
    let recognized = files.iter().filter(|entry| entry.recognized).count();
    if recognized == 0 {
        return Err(CollectError::EmptyCorpus(root.to_path_buf()));
    }
    progress.set_length(recognized as u64);
    Ok(read_files(&files, options, progress))
}
