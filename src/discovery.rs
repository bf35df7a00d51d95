use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::StageConfig;

pub struct ModuleDiscovery {
    source_root: PathBuf,
    marker: String,
    strip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredModule {
    pub source_path: PathBuf,
    pub dir_name: String,
    pub target_name: String,
}

impl ModuleDiscovery {
    pub fn new(source_root: impl AsRef<Path>, config: &StageConfig) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            marker: config.marker.clone(),
            strip: config.strip.clone(),
        }
    }

    /// Matched modules in directory listing order, each paired with its normalized name.
    pub fn discover_modules(&self) -> Result<Vec<DiscoveredModule>> {
        let paths = find_module_paths(&self.source_root, &self.marker)?;

        let modules = paths
            .into_iter()
            .map(|source_path| {
                let dir_name = base_name(&source_path);
                let target_name = normalize_name(&dir_name, &self.strip);
                DiscoveredModule {
                    source_path,
                    dir_name,
                    target_name,
                }
            })
            .collect();

        Ok(modules)
    }
}

/// Immediate child directories of `source_root` whose name contains `marker`,
/// ignoring case. Order is whatever the directory listing yields.
pub fn find_module_paths(source_root: &Path, marker: &str) -> Result<Vec<PathBuf>> {
    let marker = marker.to_lowercase();
    let mut paths = Vec::new();

    let entries = fs::read_dir(source_root)
        .with_context(|| format!("Failed to read source directory: {}", source_root.display()))?;

    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to list source directory: {}", source_root.display()))?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.contains(&marker) {
            log::debug!("matched module directory {}", path.display());
            paths.push(path);
        }
    }

    Ok(paths)
}

/// Removes every occurrence of `strip` from `dir_name`.
pub fn normalize_name(dir_name: &str, strip: &str) -> String {
    if strip.is_empty() {
        return dir_name.to_string();
    }
    dir_name.replace(strip, "")
}

pub fn names_from_paths(paths: &[PathBuf], strip: &str) -> Vec<String> {
    paths
        .iter()
        .map(|path| normalize_name(&base_name(path), strip))
        .collect()
}

/// Normalized names produced by more than one module, with how often each occurs.
pub fn duplicate_names(modules: &[DiscoveredModule]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();

    for module in modules {
        let count = counts.entry(module.target_name.as_str()).or_insert(0);
        if *count == 0 {
            order.push(module.target_name.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|name| counts[name] > 1)
        .map(|name| (name.to_string(), counts[name]))
        .collect()
}

/// True when `name` joined onto a directory names a child of it: a single
/// normal component, so not empty, `.`, `..` or anything with a separator.
pub fn is_safe_target_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
