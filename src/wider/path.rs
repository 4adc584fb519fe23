//! Normalization of image paths as written in annotation files.

use std::path::{Component, Path, PathBuf};

/// Turn an annotation image path into a relative path for the host system.
///
/// Both `/` and `\` are accepted as separators. Empty and `.` segments are
/// removed and `..` pops the previous segment when there is one, so
/// `a\\.\\b/../c.jpg` becomes `a/c.jpg`.
pub fn normalize_image_path(raw: &str) -> PathBuf {
    let mut parts: Vec<&str> = Vec::new();

    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Join a raw annotation path onto `root`.
pub fn resolve_image_path(root: &Path, raw: &str) -> PathBuf {
    root.join(normalize_image_path(raw))
}

/// Relative output path for a derived file: the normalized image path with
/// its extension replaced.
pub fn derived_output_path(raw: &str, extension: &str) -> PathBuf {
    normalize_image_path(raw).with_extension(extension)
}

/// Last component of a path as a string, or empty if there is none.
pub fn basename(path: &Path) -> String {
    path.components()
        .next_back()
        .and_then(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .unwrap_or_default()
}
