use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::builder::{BuildOutcome, ModuleBuilder};
use crate::config::StageConfig;
use crate::discovery::{ModuleDiscovery, duplicate_names, is_safe_target_name};
use crate::manifest::{GameManifest, ManifestWriter};
use crate::staging::{copy_and_overwrite, create_dir};

pub struct StagePipeline {
    source_root: PathBuf,
    target_root: PathBuf,
    config: StageConfig,
}

#[derive(Debug)]
pub struct StagedModule {
    pub name: String,
    pub path: PathBuf,
    pub build: BuildOutcome,
}

#[derive(Debug)]
pub struct StageReport {
    pub modules: Vec<StagedModule>,
    pub manifest: GameManifest,
    pub manifest_path: PathBuf,
}

impl StagePipeline {
    pub fn new(source_root: impl AsRef<Path>, target_root: impl AsRef<Path>, config: StageConfig) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            target_root: target_root.as_ref().to_path_buf(),
            config,
        }
    }

    /// Stages and builds every matched module one at a time, then writes the manifest.
    pub fn run(&self) -> Result<StageReport> {
        // Find game modules and their staged names
        let modules = ModuleDiscovery::new(&self.source_root, &self.config).discover_modules()?;

        // Refuse names that would resolve to the target root or outside it
        if let Some(unsafe_module) = modules.iter().find(|m| !is_safe_target_name(&m.target_name)) {
            bail!(
                "Module '{}' normalizes to '{}', which is not a plain directory name",
                unsafe_module.source_path.display(),
                unsafe_module.target_name
            );
        }

        for (name, count) in duplicate_names(&modules) {
            log::warn!(
                "{} modules normalize to '{}'; later copies overwrite earlier ones",
                count,
                name
            );
        }

        println!("Found {} game modules in {}", modules.len(), self.source_root.display());

        // Create the target directory
        create_dir(&self.target_root)?;

        let builder = ModuleBuilder::new(&self.config);
        let mut staged = Vec::with_capacity(modules.len());

        // Copy, overwrite, and build each module in turn
        for module in &modules {
            let dest = self.target_root.join(&module.target_name);
            copy_and_overwrite(&module.source_path, &dest)?;
            println!("Staged {} -> {}", module.source_path.display(), dest.display());

            let build = if self.config.build_enabled {
                builder.build(&dest)?
            } else {
                BuildOutcome::NoSource
            };

            if build.attempted() {
                println!("compile result {}: {}", module.target_name, build);
            }

            staged.push(StagedModule {
                name: module.target_name.clone(),
                path: dest,
                build,
            });
        }

        // Write metadata.json last
        let manifest = GameManifest::new(modules.into_iter().map(|m| m.target_name).collect());
        let manifest_path = ManifestWriter::new()
            .file_name(&self.config.manifest_file_name)
            .write_manifest(&self.target_root, &manifest)?;

        println!("Generated manifest: {}", manifest_path.display());

        Ok(StageReport {
            modules: staged,
            manifest,
            manifest_path,
        })
    }
}
