use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::SelectionError;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "heic", "heif", "avif",
];

#[derive(Debug, Default)]
pub struct Selection {
    pub paths: Vec<PathBuf>,
    pub skipped: Vec<SelectionError>,
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Resolves user-supplied paths into absolute file paths.
///
/// Files are taken as given; a directory contributes the image files it
/// directly contains, sorted by name. Inputs that cannot be read are
/// collected in `skipped` instead of failing the whole selection.
pub fn collect_paths(inputs: &[PathBuf]) -> Selection {
    let mut selection = Selection::default();

    for input in inputs {
        let path = match fs::canonicalize(input) {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Skipping missing path {}", input.display());
                selection.skipped.push(SelectionError::Missing(input.clone()));
                continue;
            }
            Err(e) => {
                selection.skipped.push(SelectionError::Unreadable {
                    path: input.clone(),
                    source: e,
                });
                continue;
            }
        };

        if path.is_dir() {
            match scan_directory(&path) {
                Ok(files) => {
                    debug!("{} image(s) in {}", files.len(), path.display());
                    selection.paths.extend(files);
                }
                Err(e) => selection.skipped.push(SelectionError::Unreadable { path, source: e }),
            }
        } else if path.is_file() {
            selection.paths.push(path);
        }
    }

    selection
}

fn scan_directory(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| is_image(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Opens the native multi-file picker. A cancelled dialog selects nothing.
#[cfg(feature = "dialog")]
pub fn pick_images() -> Vec<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select images to rename")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_files()
        .unwrap_or_default()
}
