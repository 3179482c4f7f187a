//! Packaging of the selected files into the single stream a document holds.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Local};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::PendingFile;

/// Archive name used when none is configured.
pub const DEFAULT_ARCHIVE_NAME: &str = "Archive";

/// The packaged upload: a file name and its content.
#[derive(Debug, Clone)]
pub struct Package {
    /// Name stored with the document and offered for download.
    pub file_name: String,
    /// ZIP content.
    pub data: Bytes,
}

/// Package the files for upload.
///
/// A single `.zip` file is passed through unchanged; anything else is
/// packed into a deflated archive.
pub async fn package_files(
    files: &[PendingFile],
    archive_name: &str,
    now: DateTime<Local>,
) -> AppResult<Package> {
    if files.is_empty() {
        return Err(AppError::no_files());
    }

    let file_name = upload_file_name(files, archive_name, now);

    if let [single] = files {
        if has_zip_extension(&single.name) {
            let data = single.source.read().await?;
            return Ok(Package { file_name, data });
        }
    }

    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        entries.push((file.name.clone(), file.source.read().await?));
    }

    let data = tokio::task::spawn_blocking(move || build_zip(&entries))
        .await
        .map_err(|e| AppError::internal(format!("archive task failed: {e}")))??;

    tracing::debug!(
        file_name = %file_name,
        files = files.len(),
        bytes = data.len(),
        "Packaged files"
    );

    Ok(Package {
        file_name,
        data: Bytes::from(data),
    })
}

/// Name of the uploaded document.
///
/// One file keeps its stem with a `.zip` extension (or its own name when it
/// already is a `.zip`); several files become `<archive>-<yymmdd-hhmm>.zip`.
pub fn upload_file_name(files: &[PendingFile], archive_name: &str, now: DateTime<Local>) -> String {
    if let [single] = files {
        if has_zip_extension(&single.name) {
            return single.name.clone();
        }
        let stem = Path::new(&single.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| single.name.clone());
        return format!("{stem}.zip");
    }

    let archive_name = if archive_name.trim().is_empty() {
        DEFAULT_ARCHIVE_NAME
    } else {
        archive_name.trim()
    };
    format!("{archive_name}-{}.zip", now.format("%y%m%d-%H%M"))
}

fn has_zip_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Write the entries into an in-memory deflated ZIP archive.
pub fn build_zip(entries: &[(String, Bytes)]) -> AppResult<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used = HashSet::new();

    for (name, data) in entries {
        let entry_name = unique_entry_name(name, &mut used);
        writer
            .start_file(entry_name.as_str(), options)
            .map_err(|e| zip_error(&entry_name, e))?;
        writer.write_all(data)?;
    }

    let cursor = writer.finish().map_err(|e| zip_error("archive", e))?;
    Ok(cursor.into_inner())
}

// Distinct paths may share a base name; later ones get a " (n)" suffix.
fn unique_entry_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 2;
    loop {
        let candidate = format!("{stem} ({n}){ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn zip_error(name: &str, err: zip::result::ZipError) -> AppError {
    AppError::with_source(
        ErrorKind::Internal,
        format!("failed to create archive entry {name}: {err}"),
        err,
    )
}
