//! Build-hook glue: keep translated filter mods fresh.
//!
//! The mod translator itself is an external collaborator; its whole contract
//! is file-based (read a source mod, produce a translated file, or fail
//! observably). This module owns only the discovery and freshness half of
//! that contract: find mod files by extension, compare modification times,
//! and call the translator for anything stale or missing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::Error;

/// External translator for a single mod file.
pub trait ModTranslator {
    /// Produce `dest` from `source`.
    ///
    /// # Errors
    ///
    /// Any I/O-shaped failure; the sync pass wraps it with the mod path and
    /// aborts.
    fn translate(&self, source: &Path, dest: &Path) -> io::Result<()>;
}

impl<F> ModTranslator for F
where
    F: Fn(&Path, &Path) -> io::Result<()>,
{
    fn translate(&self, source: &Path, dest: &Path) -> io::Result<()> {
        self(source, dest)
    }
}

/// Outcome of one sync pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Source mods translated this pass, in discovery order.
    pub translated: Vec<PathBuf>,
    /// Mods skipped because their translation was already newer.
    pub skipped: usize,
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

// Skip only when the destination is strictly newer; on a tie we retranslate.
fn is_fresh(source: &Path, dest: &Path) -> bool {
    match (mtime(source), mtime(dest)) {
        (Some(s), Some(d)) => d > s,
        _ => false,
    }
}

/// Discover `*.{src_ext}` mods in `mods_dir` and refresh their translations
/// under `out_dir` (as `*.{dest_ext}`), invoking `translator` for each stale
/// or missing destination.
///
/// A missing mods directory is an empty report, not an error. Sources are
/// visited in sorted order so the pass is deterministic.
///
/// # Errors
///
/// [`Error::Scan`] if the mods directory cannot be enumerated,
/// [`Error::CreateDir`] if the output directory cannot be created, or
/// [`Error::Translate`] on the first translator failure.
pub fn sync_mods(
    mods_dir: &Path,
    out_dir: &Path,
    src_ext: &str,
    dest_ext: &str,
    translator: &dyn ModTranslator,
) -> Result<SyncReport, Error> {
    let mut report = SyncReport::default();
    if !mods_dir.is_dir() {
        return Ok(report);
    }

    let scan_err = |source: io::Error| Error::Scan {
        path: mods_dir.to_path_buf(),
        source,
    };
    let mut sources = Vec::new();
    for entry in fs::read_dir(mods_dir).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();
        if path.extension().is_some_and(|e| e == src_ext) {
            sources.push(path);
        }
    }
    if sources.is_empty() {
        return Ok(report);
    }
    sources.sort();

    fs::create_dir_all(out_dir).map_err(|source| Error::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    for source in sources {
        let Some(stem) = source.file_stem() else {
            continue;
        };
        let mut dest = out_dir.join(stem);
        dest.set_extension(dest_ext);

        if is_fresh(&source, &dest) {
            report.skipped += 1;
            continue;
        }
        translator
            .translate(&source, &dest)
            .map_err(|e| Error::Translate {
                path: source.clone(),
                source: e,
            })?;
        report.translated.push(source);
    }
    Ok(report)
}
