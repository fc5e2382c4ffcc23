use std::path::{Component, Path, PathBuf};

mod fs_storage;
pub use fs_storage::FsStorage;

/// Makes a client-supplied filename safe to use as a single path segment.
pub fn sanitize_filename(name: &str) -> String {
    // Browsers on Windows may send the full client path.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mut s = base.trim().to_string();
    let invalid = [':', '*', '?', '"', '<', '>', '|', '\0'];
    for ch in invalid {
        s = s.replace(ch, "-");
    }
    s = s.replace(' ', "_");
    s = s.trim_start_matches('.').to_string();
    if s.len() > 100 {
        let mut cut = 100;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    if s.is_empty() {
        s = "file".into();
    }
    s
}

pub fn relative_from_uploads(uploads_root: &Path, full: &Path) -> String {
    match full.strip_prefix(uploads_root) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => full.to_string_lossy().replace('\\', "/"),
    }
}

/// Resolves a stored relative path, refusing anything that escapes the root.
pub fn absolute_from_relative(uploads_root: &Path, relative: &str) -> anyhow::Result<PathBuf> {
    let rel = Path::new(relative.trim_start_matches('/'));
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        anyhow::bail!("invalid storage path: {relative}");
    }
    Ok(uploads_root.join(rel))
}
