use crate::errors::{AppError, AppResult};
use crate::models::station::StationSet;
use crate::utils::path::ensure_writable;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupSummary {
    pub archive: PathBuf,
    pub files: Vec<PathBuf>,
}

pub struct BackupLogic;

impl BackupLogic {
    /// Pack every station backup CSV found in `backup_dir` into one zip archive.
    pub fn archive(
        backup_dir: &Path,
        stations: &StationSet,
        dest: &Path,
        force: bool,
    ) -> AppResult<BackupSummary> {
        // 1️⃣ Collect existing station files
        let files: Vec<PathBuf> = stations
            .codes()
            .map(|s| backup_dir.join(s.backup_file_name()))
            .filter(|p| p.is_file())
            .collect();

        if files.is_empty() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("No station backup files found in {}", backup_dir.display()),
            )));
        }

        // 2️⃣ Destination folder and overwrite check
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        ensure_writable(dest, force)?;

        // 3️⃣ Compress
        let file = fs::File::create(dest)?;
        let mut zip = ZipWriter::new(file);

        for path in &files {
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            zip.start_file(name, options)?;
            let mut f = fs::File::open(path)?;
            std::io::copy(&mut f, &mut zip)?;
        }
        zip.finish()?;

        Ok(BackupSummary {
            archive: dest.to_path_buf(),
            files,
        })
    }
}
