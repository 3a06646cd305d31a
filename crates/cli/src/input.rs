//! Turning command-line assignments into field values

use anyhow::{Context, Result};
use estate_core::{FieldValue, PendingFile};
use estate_schema::ResourceDef;
use std::path::Path;

/// Guess a MIME type from a file extension
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Read a local file for upload
pub async fn read_pending_file(path: &Path) -> Result<PendingFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(PendingFile::new(file_name, guess_mime(path), bytes))
}

/// Coerce `--set` and `--file` assignments for a resource
pub async fn collect_values(
    def: &ResourceDef,
    sets: &[(String, String)],
    files: &[(String, String)],
) -> Result<Vec<(String, FieldValue)>> {
    let mut values = Vec::with_capacity(sets.len() + files.len());

    for (name, raw) in sets {
        let field = def.require_field(name)?;
        values.push((name.clone(), field.parse(raw)?));
    }

    for (name, path) in files {
        let field = def.require_field(name)?;
        if !field.is_binary() {
            anyhow::bail!("'{}' is a {} field; use --set", name, field.kind.display_name());
        }
        let file = read_pending_file(Path::new(path)).await?;
        values.push((name.clone(), FieldValue::file(file)));
    }

    Ok(values)
}
