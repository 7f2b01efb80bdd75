use crate::model::Mtime;
use buildgraph_metrics::scoped_metric;
use std::{ffi::OsStr, io::Result, os::unix::ffi::OsStrExt};

/// Abstracts `stat()` so dirty recomputation can be driven from a mock in tests without
/// touching the real filesystem.
pub trait DiskInterface {
    /// A not-found condition is reported as `Err` with `ErrorKind::NotFound`; any other error
    /// is also `Err` and is treated the same way by `StatCache::stat_all` (logged, file
    /// considered absent). There is no separate "absent" return: the mapping from I/O result
    /// to `Mtime` lives entirely in `StatCache`.
    fn modified(&self, path: &[u8]) -> Result<Mtime>;
}

pub struct SystemDiskInterface;

impl DiskInterface for SystemDiskInterface {
    fn modified(&self, path: &[u8]) -> Result<Mtime> {
        scoped_metric!("stat");
        let os_path = OsStr::from_bytes(path);
        let meta = std::fs::metadata(os_path)?;
        let modified = meta.modified()?;
        let secs = modified
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Ok(secs)
    }
}
