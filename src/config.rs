pub const DEFAULT_MARKER: &str = "game";
pub const DEFAULT_STRIP: &str = "_game";
pub const DEFAULT_EXTENSION: &str = ".go";
pub const DEFAULT_BUILD_TOOL: &str = "go";
pub const DEFAULT_BUILD_ARG: &str = "build";
pub const MANIFEST_FILE_NAME: &str = "metadata.json";

/// Settings for a single staging run.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Substring searched for, case-insensitively, in source directory names.
    pub marker: String,
    /// Literal substring removed from a module's directory name.
    pub strip: String,
    /// File suffix identifying a module's build source.
    pub extension: String,
    pub build_tool: String,
    /// Arguments placed between the tool and the source file name.
    pub build_args: Vec<String>,
    pub build_enabled: bool,
    pub manifest_file_name: String,
}

impl StageConfig {
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            strip: DEFAULT_STRIP.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            build_args: vec![DEFAULT_BUILD_ARG.to_string()],
            build_enabled: true,
            manifest_file_name: MANIFEST_FILE_NAME.to_string(),
        }
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn strip(mut self, strip: impl Into<String>) -> Self {
        self.strip = strip.into();
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn build_command(mut self, tool: impl Into<String>, args: Vec<String>) -> Self {
        self.build_tool = tool.into();
        self.build_args = args;
        self
    }

    pub fn build_enabled(mut self, enabled: bool) -> Self {
        self.build_enabled = enabled;
        self
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::new()
    }
}
