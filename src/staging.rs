use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Creates `path` if it does not exist. Existing contents are left alone.
pub fn create_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir(path)
            .with_context(|| format!("Failed to create target directory: {}", path.display()))?;
    }
    Ok(())
}

/// Replaces `dest` with a full copy of `source`.
///
/// The existing `dest` is removed before the copy starts, so the operation is
/// not atomic: a failure part way through leaves `dest` missing or partially
/// populated.
pub fn copy_and_overwrite(source: &Path, dest: &Path) -> Result<()> {
    // Drop the previous copy
    if dest.exists() {
        log::debug!("removing previous copy {}", dest.display());
        fs::remove_dir_all(dest)
            .with_context(|| format!("Failed to remove existing directory: {}", dest.display()))?;
    }
    copy_tree(source, dest)
}

/// Recursively copies the directory `source` to `dest`, which must not exist yet.
/// Symbolic links are followed and their targets copied.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        anyhow::bail!("Destination already exists: {}", dest.display());
    }

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry
            .with_context(|| format!("Failed to walk source directory: {}", source.display()))?;

        let relative = entry.path().strip_prefix(source).with_context(|| {
            format!("Walked outside of source directory: {}", entry.path().display())
        })?;
        let dest_path = dest.join(relative);

        // WalkDir yields each directory before its contents
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create directory: {}", dest_path.display()))?;
        } else {
            fs::copy(entry.path(), &dest_path).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    dest_path.display()
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("assets").join("sprites")).unwrap();
        fs::write(root.join("main.go"), "package main").unwrap();
        fs::write(root.join("assets").join("sprites").join("hero.png"), [0u8, 1, 2]).unwrap();
    }

    #[test]
    fn test_create_dir_keeps_existing_contents() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out");

        create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "keep").unwrap();
        create_dir(&target).unwrap();

        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "keep");
    }

    #[test]
    fn test_copy_tree_copies_nested_files() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("pong_game");
        populate(&source);

        let dest = tmp.path().join("pong");
        copy_tree(&source, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("main.go")).unwrap(), "package main");
        assert_eq!(
            fs::read(dest.join("assets").join("sprites").join("hero.png")).unwrap(),
            vec![0u8, 1, 2]
        );
    }

    #[test]
    fn test_copy_tree_refuses_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        populate(&source);
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        assert!(copy_tree(&source, &dest).is_err());
    }

    #[test]
    fn test_copy_and_overwrite_drops_stale_files() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("chess_game");
        populate(&source);

        let dest = tmp.path().join("chess");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("stale.bin"), "old build").unwrap();

        copy_and_overwrite(&source, &dest).unwrap();

        assert!(!dest.join("stale.bin").exists());
        assert!(dest.join("main.go").exists());
    }
}
