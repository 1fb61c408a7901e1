// ABOUTME: Output tree layout and file writes for exported folders
// ABOUTME: Maps remote folders to local directories, writes notes atomically

use crate::convert::RESOURCE_DIR;
use crate::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Local directories for one remote folder: the notes directory and its `index_files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub folder: String,
    pub folder_dir: PathBuf,
    pub resource_dir: PathBuf,
}

impl ExportTarget {
    pub fn new(output_root: &Path, folder: &str) -> Self {
        let relative = folder.strip_prefix('/').unwrap_or(folder);
        let folder_dir = output_root.join(relative);

        ExportTarget {
            folder: folder.to_string(),
            resource_dir: folder_dir.join(RESOURCE_DIR),
            folder_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.folder_dir, &self.resource_dir] {
            fs::create_dir_all(dir).map_err(|source| Error::Directory {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Joins a remote-supplied name onto `dir`, refusing anything that could leave `dir`.
pub fn contained_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let escapes = name.is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if escapes {
        return Err(Error::write(
            relative,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "name is absolute or leaves the export directory",
            ),
        ));
    }

    Ok(dir.join(relative))
}

/// Writes through a sibling temp file and renames it over `path`.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    use rand::Rng;

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let random: u32 = rand::thread_rng().gen();
    let tmp_path = parent.join(format!(".{:x}.part", random));

    if let Err(e) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::write(path, e));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::write(path, e)
    })
}

pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::write(path, e))
}

/// True when any filesystem entry is present at `path`, including dangling symlinks.
pub fn entry_exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::write(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_target_strips_leading_separator() {
        let target = ExportTarget::new(Path::new("/out"), "/Notes/");
        assert_eq!(target.folder_dir, Path::new("/out/Notes/"));
        assert_eq!(target.resource_dir, Path::new("/out/Notes/index_files"));
        assert_eq!(target.folder, "/Notes/");
    }

    #[test]
    fn test_export_target_nested_folder() {
        let target = ExportTarget::new(Path::new("out"), "/Work/2024/");
        assert_eq!(target.folder_dir, Path::new("out/Work/2024"));
    }

    #[test]
    fn test_export_target_without_leading_separator() {
        let target = ExportTarget::new(Path::new("out"), "Journal");
        assert_eq!(target.folder_dir, Path::new("out/Journal"));
    }

    #[test]
    fn test_ensure_dirs_creates_structure() {
        let temp = TempDir::new().unwrap();
        let target = ExportTarget::new(temp.path(), "/日记/");
        target.ensure_dirs().unwrap();

        assert!(target.folder_dir.is_dir());
        assert!(target.resource_dir.is_dir());
    }

    #[test]
    fn test_ensure_dirs_reports_directory_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("Notes");
        fs::write(&blocker, b"not a directory").unwrap();

        let target = ExportTarget::new(temp.path(), "/Notes/");
        let err = target.ensure_dirs().unwrap_err();
        assert!(matches!(err, Error::Directory { .. }));
    }

    #[test]
    fn test_contained_path_plain_name() {
        let dir = Path::new("/out/Notes");
        assert_eq!(
            contained_path(dir, "Plan.md").unwrap(),
            Path::new("/out/Notes/Plan.md")
        );
        assert!(contained_path(dir, "sub/pic.png")
            .unwrap()
            .starts_with(dir));
    }

    #[test]
    fn test_contained_path_rejects_absolute_name() {
        let err = contained_path(Path::new("/out/Notes"), "/abs/evil.md").unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }

    #[test]
    fn test_contained_path_rejects_parent_components() {
        let dir = Path::new("/out/Notes/index_files");
        assert!(contained_path(dir, "../../escape.png").is_err());
        assert!(contained_path(dir, "a/../../b.png").is_err());
        assert!(contained_path(dir, "").is_err());
    }
}
