use std::{fs, io, path::PathBuf};

use crate::error::AppError;

/// An absolute filesystem path derived from a request path, ready for I/O.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    pub absolute: PathBuf,
    pub is_directory: bool,
}

/// Target of a file request. `path` echoes the request remainder back to the
/// client; `absolute` is where the file lives on disk.
#[derive(Debug, Clone)]
pub struct FileTarget {
    pub name: String,
    pub path: String,
    pub absolute: PathBuf,
}

/// Maps URL path remainders onto the filesystem under a fixed server root.
///
/// Resolution is purely request-local: no process working directory is ever
/// read or mutated, so concurrent requests cannot observe each other's
/// resolution state.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolves a directory request. An empty remainder means the server
    /// root itself; anything else is joined under the root. NotFound and
    /// PermissionDenied from the OS both surface as the same generic
    /// resolution failure.
    pub fn resolve(&self, remainder: &str) -> Result<ResolvedPath, AppError> {
        let target = self.rooted(remainder);
        let absolute = fs::canonicalize(&target).map_err(AppError::Resolve)?;
        let metadata = fs::metadata(&absolute).map_err(AppError::Resolve)?;
        Ok(ResolvedPath {
            absolute,
            is_directory: metadata.is_dir(),
        })
    }

    /// Resolves a file request without requiring the file to exist; the
    /// accessor creates missing files lazily. The display name is the last
    /// `/`-delimited segment of the remainder.
    pub fn resolve_file(&self, remainder: &str) -> Result<FileTarget, AppError> {
        let trimmed = remainder.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(AppError::Resolve(io::Error::new(
                io::ErrorKind::InvalidInput,
                "there is no file specified",
            )));
        }
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed).to_string();
        Ok(FileTarget {
            name,
            path: format!("/{trimmed}"),
            absolute: self.root.join(trimmed),
        })
    }

    fn rooted(&self, remainder: &str) -> PathBuf {
        let trimmed = remainder.trim_start_matches('/');
        if trimmed.is_empty() {
            self.root.clone()
        } else {
            // Path::join would discard the root if the remainder kept its
            // leading slash.
            self.root.join(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn resolver(dir: &TempDir) -> PathResolver {
        PathResolver::new(dir.path().to_path_buf())
    }

    #[test]
    fn empty_remainder_resolves_to_root() {
        let dir = TempDir::new().unwrap();
        let resolved = resolver(&dir).resolve("").unwrap();
        assert_eq!(resolved.absolute, dir.path().canonicalize().unwrap());
        assert!(resolved.is_directory);
    }

    #[test]
    fn remainder_is_joined_under_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("inner")).unwrap();
        let resolved = resolver(&dir).resolve("/inner").unwrap();
        assert_eq!(
            resolved.absolute,
            dir.path().join("inner").canonicalize().unwrap()
        );
        assert!(resolved.is_directory);
    }

    #[test]
    fn resolving_a_file_marks_it_as_non_directory() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        let resolved = resolver(&dir).resolve("a.txt").unwrap();
        assert!(!resolved.is_directory);
    }

    #[test]
    fn missing_path_is_a_resolution_failure() {
        let dir = TempDir::new().unwrap();
        let err = resolver(&dir).resolve("nope").unwrap_err();
        assert!(matches!(err, AppError::Resolve(_)));
    }

    #[test]
    fn file_target_uses_last_segment_as_name() {
        let dir = TempDir::new().unwrap();
        let target = resolver(&dir).resolve_file("/docs/readme.md").unwrap();
        assert_eq!(target.name, "readme.md");
        assert_eq!(target.path, "/docs/readme.md");
        assert_eq!(target.absolute, dir.path().join("docs/readme.md"));
    }

    #[test]
    fn empty_file_remainder_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolver(&dir).resolve_file(""),
            Err(AppError::Resolve(_))
        ));
        assert!(matches!(
            resolver(&dir).resolve_file("/"),
            Err(AppError::Resolve(_))
        ));
    }
}
