//! Finding the documents to lint.

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::path::{Path, PathBuf};

/// Extensions of documents that can contain shell transcripts.
pub const DOCUMENT_GLOBS: &[&str] = &["*.rst", "*.rest", "*.md", "*.markdown"];

/// Expands directory-style patterns to also match files within them.
///
/// Patterns containing glob characters (*, ?, [) are returned unchanged.
fn expand_directory_pattern(pattern: &str) -> Vec<String> {
    if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
        return vec![pattern.to_string()];
    }

    let base = pattern.trim_end_matches('/');
    vec![base.to_string(), format!("{base}/**")]
}

/// Collect the documents under `paths`, honoring `.gitignore` files and `exclude` globs.
///
/// Files given explicitly are always returned, whatever their extension.
pub fn find_documents(paths: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>, ignore::Error> {
    let default_root = [PathBuf::from(".")];
    let paths = if paths.is_empty() { &default_root[..] } else { paths };

    let mut documents: Vec<PathBuf> = paths.iter().filter(|p| p.is_file()).cloned().collect();

    let dirs: Vec<&PathBuf> = paths.iter().filter(|p| p.is_dir()).collect();
    for missing in paths.iter().filter(|p| !p.exists()) {
        log::warn!("Path not found: {}", missing.display());
    }

    if let Some((first, rest)) = dirs.split_first() {
        let mut walk_builder = WalkBuilder::new(first);
        for dir in rest {
            walk_builder.add(dir);
        }

        let mut types_builder = ignore::types::TypesBuilder::new();
        for glob in DOCUMENT_GLOBS {
            types_builder.add("docs", glob)?;
        }
        types_builder.select("docs");
        walk_builder.types(types_builder.build()?);

        if !exclude.is_empty() {
            let mut override_builder = OverrideBuilder::new(".");
            for pattern in exclude.iter().flat_map(|p| expand_directory_pattern(p)) {
                if let Err(e) = override_builder.add(&format!("!{pattern}")) {
                    log::warn!("Invalid exclude pattern '{pattern}': {e}");
                }
            }
            walk_builder.overrides(override_builder.build()?);
        }

        walk_builder.hidden(true).git_ignore(true).require_git(false);

        for entry in walk_builder.build() {
            let entry = entry?;
            if entry.file_type().is_some_and(|t| t.is_file()) {
                documents.push(normalize(entry.path()));
            }
        }
    }

    documents.sort();
    documents.dedup();
    Ok(documents)
}

/// Drop a leading `./` so report lines read `docs/index.rst`.
fn normalize(path: &Path) -> PathBuf {
    path.strip_prefix(".").map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_expand_directory_pattern() {
        assert_eq!(expand_directory_pattern("_build/"), vec!["_build", "_build/**"]);
        assert_eq!(expand_directory_pattern("*.md"), vec!["*.md"]);
    }

    #[test]
    fn test_finds_documents_by_extension() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::write(dir.path().join("docs").join("index.rst"), "").unwrap();
        fs::write(dir.path().join("docs").join("conf.py"), "").unwrap();

        let found = find_documents(&[dir.path().to_path_buf()], &[]).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("README.md"), dir.path().join("docs").join("index.rst")]
        );
    }

    #[test]
    fn test_gitignore_is_respected() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("_build")).unwrap();
        fs::write(dir.path().join(".gitignore"), "_build/\n").unwrap();
        fs::write(dir.path().join("_build").join("index.rst"), "").unwrap();
        fs::write(dir.path().join("index.rst"), "").unwrap();

        let found = find_documents(&[dir.path().to_path_buf()], &[]).unwrap();
        assert_eq!(found, vec![dir.path().join("index.rst")]);
    }

    #[test]
    fn test_explicit_file_is_always_linted() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "").unwrap();
        let found = find_documents(std::slice::from_ref(&file), &["*.txt".to_string()]).unwrap();
        assert_eq!(found, vec![file]);
    }
}
