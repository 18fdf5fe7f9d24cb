use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{AppConfig, ConfigBuilder};
use crate::inference::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::naming::RenameMode;

/// Rename images by pattern or by asking a local vision model to describe them.
#[derive(Debug, Parser)]
#[command(name = "image-rename", version, about)]
pub struct Cli {
    /// Image files or directories to add to the working set
    pub paths: Vec<PathBuf>,

    /// How new names are produced
    #[arg(short, long, value_enum, default_value_t = RenameMode::PatternRename)]
    pub mode: RenameMode,

    /// Text used by the prefix and suffix modes
    #[arg(long, default_value = "")]
    pub pattern: String,

    /// Base URL of the Ollama-compatible inference server
    #[arg(long, env = "IMAGE_RENAME_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Vision model used to describe images
    #[arg(long, env = "IMAGE_RENAME_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Per-request timeout for the inference server, in seconds
    #[arg(long, env = "IMAGE_RENAME_TIMEOUT", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Where the interactive UI writes its log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Run without the terminal UI: generate, print the preview and exit
    #[arg(long)]
    pub no_tui: bool,

    /// With --no-tui, apply the renames after previewing them
    #[arg(long, requires = "no_tui")]
    pub apply: bool,

    /// Only report whether the model is available, then exit
    #[arg(long)]
    pub check: bool,

    /// Open the native file picker before starting
    #[cfg(feature = "dialog")]
    #[arg(long)]
    pub pick: bool,
}

impl Cli {
    pub fn to_config(&self) -> Result<AppConfig> {
        ConfigBuilder::new()
            .endpoint(&self.endpoint)
            .model(&self.model)
            .timeout_secs(self.timeout_secs)
            .mode(self.mode)
            .pattern(&self.pattern)
            .log_file(self.log_file.as_ref())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headless_prefix_run() {
        let cli = Cli::try_parse_from([
            "image-rename",
            "--no-tui",
            "--apply",
            "--mode",
            "prefix",
            "--pattern",
            "vac_",
            "/photos/a.jpg",
            "/photos/b.jpg",
        ])
        .unwrap();

        assert!(cli.no_tui && cli.apply);
        assert_eq!(cli.mode, RenameMode::Prefix);
        assert_eq!(cli.paths.len(), 2);

        let config = cli.to_config().unwrap();
        assert_eq!(config.pattern, "vac_");
    }

    #[test]
    fn test_model_mode_name() {
        let cli = Cli::try_parse_from(["image-rename", "-m", "model"]).unwrap();
        assert_eq!(cli.mode, RenameMode::ModelSuggested);
    }

    #[test]
    fn test_apply_requires_headless() {
        assert!(Cli::try_parse_from(["image-rename", "--apply"]).is_err());
    }
}
