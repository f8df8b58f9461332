//! Source file loading
//!
//! Reads review targets from disk, maps extensions to language names and
//! collects the line-count metadata that goes into review prompts. Invalid
//! UTF-8 is read lossily rather than rejected; a review target with a few
//! mangled bytes is still reviewable.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension (lowercased, with dot) to language display name.
pub const SUPPORTED_EXTENSIONS: &[(&str, &str)] = &[
    (".py", "Python"),
    (".js", "JavaScript"),
    (".ts", "TypeScript"),
    (".jsx", "JavaScript (React)"),
    (".tsx", "TypeScript (React)"),
    (".java", "Java"),
    (".c", "C"),
    (".cpp", "C++"),
    (".cc", "C++"),
    (".h", "C/C++ Header"),
    (".hpp", "C++ Header"),
    (".cs", "C#"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".rb", "Ruby"),
    (".php", "PHP"),
    (".swift", "Swift"),
    (".kt", "Kotlin"),
    (".scala", "Scala"),
    (".sh", "Shell Script"),
    (".bash", "Bash Script"),
    (".sql", "SQL"),
    (".html", "HTML"),
    (".css", "CSS"),
    (".scss", "SCSS"),
    (".sass", "Sass"),
    (".json", "JSON"),
    (".yaml", "YAML"),
    (".yml", "YAML"),
    (".xml", "XML"),
    (".md", "Markdown"),
    (".r", "R"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub language: String,
    pub extension: String,
    pub size_bytes: usize,
    pub line_count: usize,
    pub non_empty_lines: usize,
}

/// A loaded review target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    pub content: String,
    pub metadata: SourceMetadata,
}

fn normalized_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Language display name for a path, if the extension is recognized.
pub fn language_for(path: &Path) -> Option<&'static str> {
    let ext = normalized_extension(path)?;
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
}

pub fn is_supported(path: &Path) -> bool {
    language_for(path).is_some()
}

/// Read a source file and compute its metadata.
pub fn read_source_file(path: &Path) -> Result<SourceFile> {
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("Path is not a file: {}", path.display()));
    }

    let language = language_for(path).ok_or_else(|| {
        anyhow!(
            "Unsupported file type: {}",
            normalized_extension(path).unwrap_or_default()
        )
    })?;

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let line_count = content.split('\n').count();
    let non_empty_lines = content.split('\n').filter(|l| !l.trim().is_empty()).count();

    Ok(SourceFile {
        path: path.to_path_buf(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        metadata: SourceMetadata {
            language: language.to_string(),
            extension: normalized_extension(path).unwrap_or_default(),
            size_bytes: bytes.len(),
            line_count,
            non_empty_lines,
        },
        content,
    })
}

/// Find all supported source files under `directory`, sorted by path.
pub fn find_source_files(directory: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !directory.exists() {
        return Err(anyhow!("Directory not found: {}", directory.display()));
    }
    if !directory.is_dir() {
        return Err(anyhow!("Path is not a directory: {}", directory.display()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported(path))
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_language_mapping() {
        assert_eq!(language_for(Path::new("main.rs")), Some("Rust"));
        assert_eq!(language_for(Path::new("app.PY")), Some("Python"));
        assert_eq!(language_for(Path::new("notes.txt")), None);
        assert_eq!(language_for(Path::new("Makefile")), None);
    }

    #[test]
    fn test_read_source_file_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.py");
        std::fs::write(&path, "def f():\n\n    return 1\n").unwrap();

        let file = read_source_file(&path).unwrap();
        assert_eq!(file.name, "sample.py");
        assert_eq!(file.metadata.language, "Python");
        assert_eq!(file.metadata.line_count, 4);
        assert_eq!(file.metadata.non_empty_lines, 2);
    }

    #[test]
    fn test_read_unsupported_extension_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();
        assert!(read_source_file(&path).is_err());
    }

    #[test]
    fn test_find_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join("a.py"), "pass").unwrap();
        std::fs::write(dir.path().join("sub/c.go"), "package main").unwrap();
        std::fs::write(dir.path().join("ignore.bin"), "x").unwrap();

        let recursive = find_source_files(dir.path(), true).unwrap();
        let names: Vec<_> = recursive
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.py", "b.rs", "c.go"]);

        let flat = find_source_files(dir.path(), false).unwrap();
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_find_files_on_missing_directory() {
        assert!(find_source_files(Path::new("/no/such/dir"), true).is_err());
    }
}
