use std::path::Path;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;

use crate::working_set::FileEntry;

static INVALID_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RenameMode {
    /// Sequential File_01, File_02, ... names
    #[default]
    #[value(name = "pattern")]
    PatternRename,
    /// Text placed before the original name
    Prefix,
    /// Text placed after the original name
    Suffix,
    /// Label suggested by the local vision model
    #[value(name = "model")]
    ModelSuggested,
}

impl RenameMode {
    pub const ALL: [RenameMode; 4] = [
        RenameMode::PatternRename,
        RenameMode::Prefix,
        RenameMode::Suffix,
        RenameMode::ModelSuggested,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RenameMode::PatternRename => "Smart Rename",
            RenameMode::Prefix => "Add Prefix",
            RenameMode::Suffix => "Add Suffix",
            RenameMode::ModelSuggested => "AI Describe",
        }
    }

    pub fn next(&self) -> RenameMode {
        let index = Self::ALL.iter().position(|mode| mode == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Modes whose names are computed instantly from the pattern and position.
    pub fn is_pattern_based(&self) -> bool {
        !matches!(self, RenameMode::ModelSuggested)
    }

    pub fn uses_user_pattern(&self) -> bool {
        matches!(self, RenameMode::Prefix | RenameMode::Suffix)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NamingContext<'a> {
    /// Position of the entry in the working set.
    pub index: usize,
    pub user_pattern: &'a str,
    /// Model label, already sanitized.
    pub model_output: Option<&'a str>,
}

/// Computes the candidate file name for `entry` under `mode`.
///
/// The original extension is always kept and never taken from the pattern or
/// the model. The result never contains a path separator.
pub fn compute_name(entry: &FileEntry, mode: RenameMode, context: NamingContext<'_>) -> String {
    let (stem, extension) = split_name(entry.original_path());
    let stem = sanitize_filename(&stem);

    match mode {
        RenameMode::PatternRename => {
            with_extension(&format!("File_{:02}", context.index + 1), extension.as_deref())
        }
        RenameMode::Prefix => {
            let pattern = sanitize_filename(context.user_pattern);
            with_extension(&format!("{}{}", pattern, stem), extension.as_deref())
        }
        RenameMode::Suffix => {
            let pattern = sanitize_filename(context.user_pattern);
            with_extension(&format!("{}{}", stem, pattern), extension.as_deref())
        }
        RenameMode::ModelSuggested => match context.model_output {
            Some(label) => with_extension(&sanitize_filename(label), extension.as_deref()),
            None => entry.proposed_name().to_string(),
        },
    }
}

/// Replaces characters that are not allowed in file names with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    INVALID_FILENAME_CHARS.replace_all(filename, "_").to_string()
}

/// Splits a path's file name into stem and extension. Dotfiles such as
/// `.profile` have no extension.
pub fn split_name(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string());
    (stem, extension)
}

fn with_extension(base: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", base, ext),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(path: &str) -> FileEntry {
        FileEntry::new(PathBuf::from(path))
    }

    fn ctx(index: usize, user_pattern: &str) -> NamingContext<'_> {
        NamingContext {
            index,
            user_pattern,
            model_output: None,
        }
    }

    #[test]
    fn test_backslash_in_original_name_is_replaced() {
        let original = entry("/a/b/left\\right.jpg");
        let name = compute_name(&original, RenameMode::Prefix, ctx(0, "vac_"));
        assert_eq!(name, "vac_left_right.jpg");

        let name = compute_name(&original, RenameMode::Suffix, ctx(0, "_x"));
        assert_eq!(name, "left_right_x.jpg");
    }

    #[test]
    fn test_prefix_mode() {
        let name = compute_name(&entry("/a/b/cat.jpg"), RenameMode::Prefix, ctx(0, "vac_"));
        assert_eq!(name, "vac_cat.jpg");
    }

    #[test]
    fn test_suffix_mode() {
        let name = compute_name(&entry("/a/b/cat.jpg"), RenameMode::Suffix, ctx(3, "_2024"));
        assert_eq!(name, "cat_2024.jpg");
    }

    #[test]
    fn test_pattern_rename_counts_from_one() {
        let file = entry("/a/b/IMG001.png");
        assert_eq!(compute_name(&file, RenameMode::PatternRename, ctx(0, "")), "File_01.png");
        assert_eq!(compute_name(&file, RenameMode::PatternRename, ctx(9, "")), "File_10.png");
        assert_eq!(compute_name(&file, RenameMode::PatternRename, ctx(122, "")), "File_123.png");
    }

    #[test]
    fn test_empty_pattern_is_vacuous() {
        let file = entry("/a/b/cat.jpg");
        assert_eq!(compute_name(&file, RenameMode::Prefix, ctx(0, "")), "cat.jpg");
        assert_eq!(compute_name(&file, RenameMode::Suffix, ctx(0, "")), "cat.jpg");
    }

    #[test]
    fn test_model_mode_keeps_original_extension() {
        let file = entry("/photos/DSC_0042.JPG");
        let context = NamingContext {
            index: 0,
            user_pattern: "ignored",
            model_output: Some("a_red_sports_car"),
        };
        assert_eq!(
            compute_name(&file, RenameMode::ModelSuggested, context),
            "a_red_sports_car.JPG"
        );
    }

    #[test]
    fn test_model_mode_without_output_keeps_current_name() {
        let file = entry("/photos/beach.png");
        assert_eq!(compute_name(&file, RenameMode::ModelSuggested, ctx(0, "")), "beach.png");
    }

    #[test]
    fn test_extension_is_preserved_in_every_mode() {
        let samples = ["/a/cat.jpg", "/a/archive.tar.gz", "/a/README", "/a/x.y.webp"];
        for sample in samples {
            let file = entry(sample);
            let original_ext = Path::new(sample).extension().map(|e| e.to_os_string());
            for mode in RenameMode::ALL {
                let context = NamingContext {
                    index: 4,
                    user_pattern: "tag",
                    model_output: Some("label"),
                };
                let name = compute_name(&file, mode, context);
                assert_eq!(
                    Path::new(&name).extension().map(|e| e.to_os_string()),
                    original_ext,
                    "{:?} changed the extension of {}",
                    mode,
                    sample
                );
            }
        }
    }

    #[test]
    fn test_hostile_patterns_never_yield_separators() {
        let file = entry("/a/b/cat.jpg");
        for pattern in ["../", "a/b", "c:\\d", "x\ny", "what?"] {
            for mode in [RenameMode::Prefix, RenameMode::Suffix] {
                let name = compute_name(&file, mode, ctx(0, pattern));
                assert!(!name.contains('/') && !name.contains('\\'), "{}", name);
            }
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Test: File/Name"), "Test_ File_Name");
        assert_eq!(sanitize_filename("Normal_File.Name"), "Normal_File.Name");
    }

    #[test]
    fn test_mode_cycle_visits_every_mode() {
        let mut mode = RenameMode::default();
        let mut seen = Vec::new();
        for _ in 0..RenameMode::ALL.len() {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, RenameMode::PatternRename);
        assert_eq!(seen, RenameMode::ALL.to_vec());
    }
}
