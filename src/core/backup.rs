use crate::db::store::SqliteStore;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::store::EventStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Write a consistent copy of the ledger to `dest_file`, optionally
    /// zipped. Returns the path of the file actually produced.
    pub fn backup(
        store: &SqliteStore,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let dest = Path::new(dest_file);

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        ensure_writable(dest, force)?;
        if dest.exists() {
            fs::remove_file(dest)?;
        }

        // VACUUM INTO copies through the open connection, so a write in
        // flight elsewhere can never leave a torn copy.
        let target = dest.to_string_lossy().to_string();
        store.with_pool(|pool| {
            pool.conn.execute("VACUUM INTO ?1", [&target])?;
            Ok(())
        })?;

        let final_path = if compress {
            let zipped = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warn!("failed to remove uncompressed backup {}: {e}", dest.display());
            }
            zipped
        } else {
            dest.to_path_buf()
        };

        store.audit(
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(final_path)
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "shiftledger.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish()?;

    Ok(zip_path)
}
