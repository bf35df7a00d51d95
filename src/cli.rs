use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::{
    DEFAULT_BUILD_ARG, DEFAULT_BUILD_TOOL, DEFAULT_EXTENSION, DEFAULT_MARKER, DEFAULT_STRIP, StageConfig,
};
use crate::pipeline::StagePipeline;

#[derive(Parser, Debug)]
#[command(name = "gamestage")]
#[command(about = "Stage game modules into a target directory, build them, and write metadata.json")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Directory whose immediate subdirectories are scanned for game modules
    pub source: PathBuf,

    /// Directory the modules are staged into
    pub target: PathBuf,

    /// Substring (case-insensitive) identifying a game module directory
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Substring removed from a module's directory name to form its staged name
    #[arg(long, default_value = DEFAULT_STRIP)]
    pub strip: String,

    /// Extension of the file handed to the build tool
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Build tool invoked in each staged module
    #[arg(long, default_value = DEFAULT_BUILD_TOOL)]
    pub build_tool: String,

    /// Arguments passed to the build tool before the source file
    #[arg(long = "build-arg", default_value = DEFAULT_BUILD_ARG, allow_hyphen_values = true)]
    pub build_args: Vec<String>,

    /// Stage modules and write the manifest without building
    #[arg(long)]
    pub no_build: bool,

    /// Print debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn stage_config(&self) -> StageConfig {
        StageConfig::new()
            .marker(&self.marker)
            .strip(&self.strip)
            .extension(&self.extension)
            .build_command(&self.build_tool, self.build_args.clone())
            .build_enabled(!self.no_build)
    }
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    stage_command(&cli)
}

fn stage_command(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let source = resolve_path(&cwd, &cli.source);
    let target = resolve_path(&cwd, &cli.target);

    let report = StagePipeline::new(&source, &target, cli.stage_config()).run()?;

    let failed = report
        .modules
        .iter()
        .filter(|m| m.build.attempted() && !m.build.success())
        .count();
    if failed > 0 {
        log::warn!("{} of {} module builds did not succeed", failed, report.modules.len());
    }

    println!("\nStaged {} games", report.manifest.number_of_games);

    Ok(())
}

/// Joins `path` onto `cwd`; absolute paths are returned unchanged.
pub fn resolve_path(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_exactly_two_paths() {
        assert!(Cli::try_parse_from(["gamestage"]).is_err());
        assert!(Cli::try_parse_from(["gamestage", "src"]).is_err());
        assert!(Cli::try_parse_from(["gamestage", "src", "out", "extra"]).is_err());
        assert!(Cli::try_parse_from(["gamestage", "src", "out"]).is_ok());
    }

    #[test]
    fn test_default_config_from_args() {
        let cli = Cli::try_parse_from(["gamestage", "src", "out"]).unwrap();
        let config = cli.stage_config();

        assert_eq!(cli.source, PathBuf::from("src"));
        assert_eq!(cli.target, PathBuf::from("out"));
        assert_eq!(config.marker, "game");
        assert_eq!(config.strip, "_game");
        assert_eq!(config.build_tool, "go");
        assert_eq!(config.build_args, vec!["build".to_string()]);
        assert!(config.build_enabled);
    }

    #[test]
    fn test_overridden_build_command() {
        let cli = Cli::try_parse_from([
            "gamestage",
            "src",
            "out",
            "--build-tool",
            "cc",
            "--build-arg",
            "-c",
            "--build-arg",
            "-O2",
            "--extension",
            ".c",
            "--no-build",
        ])
        .unwrap();
        let config = cli.stage_config();

        assert_eq!(config.build_tool, "cc");
        assert_eq!(config.build_args, vec!["-c".to_string(), "-O2".to_string()]);
        assert_eq!(config.extension, ".c");
        assert!(!config.build_enabled);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path() {
        let cwd = PathBuf::from("/work");
        assert_eq!(resolve_path(&cwd, Path::new("games")), PathBuf::from("/work/games"));
        assert_eq!(resolve_path(&cwd, Path::new("/abs/games")), PathBuf::from("/abs/games"));
    }
}
