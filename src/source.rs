//! Finding and parsing the Rust source files of a function project.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks a project directory collecting `.rs` files.
///
/// `target` and hidden directories (those starting with `.`) are skipped.
///
/// # Example
///
/// ```no_run
/// use functions_swagger::source::SourceScanner;
/// use std::path::PathBuf;
///
/// let scanner = SourceScanner::new(PathBuf::from("./my-functions"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct SourceScanner {
    root_path: PathBuf,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Paths of all discovered `.rs` files, in walk order
    pub rust_files: Vec<PathBuf>,
    /// Entries that could not be read
    pub warnings: Vec<String>,
}

impl SourceScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree. Inaccessible entries are recorded as
    /// warnings and the walk continues.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root_path.display());
        }

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && file_name != "target"
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!("Scan found {} Rust file(s)", rust_files.len());
        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}

/// A successfully parsed Rust file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub syntax_tree: syn::File,
}

/// Parses Rust sources with `syn`.
pub struct SourceParser;

impl SourceParser {
    /// Reads and parses one file.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path, &content)
    }

    /// Parses source text that was already read; `path` is kept for reporting.
    pub fn parse_source(path: &Path, content: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses every file, logging and dropping the ones that fail.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<ParsedFile> {
        let mut parsed = Vec::with_capacity(paths.len());

        for path in paths {
            match Self::parse_file(path) {
                Ok(file) => parsed.push(file),
                Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
            }
        }

        debug!(
            "Parsing complete: {} succeeded, {} failed",
            parsed.len(),
            paths.len() - parsed.len()
        );
        parsed
    }
}
