use std::{fs, io};

use crate::{
    error::AppError,
    models::files::{DirectoryListing, FileEntry},
    resolve::{FileTarget, ResolvedPath},
};

/// Enumerates the direct children of a resolved directory. Entries keep the
/// order the filesystem returns them in; they are never re-sorted.
pub fn list_dir(resolved: &ResolvedPath) -> Result<DirectoryListing, AppError> {
    if !resolved.is_directory {
        return Err(AppError::Listing(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }

    let dir_path = resolved.absolute.to_string_lossy().into_owned();
    let mut files = Vec::new();
    for entry in fs::read_dir(&resolved.absolute).map_err(AppError::Listing)? {
        let entry = entry.map_err(AppError::Listing)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = format!("{dir_path}/{name}");
        // A failed stat on any child fails the whole listing.
        let metadata = fs::metadata(entry.path()).map_err(AppError::Listing)?;
        files.push(FileEntry {
            name,
            path,
            content: None,
            is_dir: metadata.is_dir(),
        });
    }

    Ok(DirectoryListing {
        path: dir_path,
        files,
    })
}

/// Reads a file's content, creating it empty when it does not exist yet.
/// A fresh file reports no content; an existing file reports its bytes
/// exactly as read.
pub fn access_file(target: &FileTarget) -> Result<FileEntry, AppError> {
    match fs::read(&target.absolute) {
        Ok(content) => Ok(FileEntry {
            name: target.name.clone(),
            path: target.path.clone(),
            content: Some(content),
            is_dir: false,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::write(&target.absolute, b"").map_err(AppError::FileAccess)?;
            Ok(FileEntry {
                name: target.name.clone(),
                path: target.path.clone(),
                content: None,
                is_dir: false,
            })
        }
        // Permission or I/O failures propagate without attempting creation.
        Err(err) => Err(AppError::FileAccess(err)),
    }
}
