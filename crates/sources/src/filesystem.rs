//! Free space sensor for an arbitrary path (`fs//<path>`)

use anyhow::Result;
use std::ffi::CString;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use sysmon_core::{format_binary_size, FetchContext, Sensor, SensorError, SensorMetadata, NOT_AVAILABLE};

const FS_PREFIX: &str = "fs//";

/// Bytes available to unprivileged users on the filesystem holding `path`
pub fn available_bytes(path: &Path) -> Option<u64> {
    let path_cstr = CString::new(path.as_os_str().as_bytes()).ok()?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: statvfs is a POSIX syscall that initializes the stat buffer on success
    let stat = unsafe {
        if libc::statvfs(path_cstr.as_ptr(), stat.as_mut_ptr()) != 0 {
            return None;
        }
        stat.assume_init()
    };
    Some(stat.f_bavail as u64 * stat.f_frsize as u64)
}

/// Available space in the file system containing a path.
///
/// The path is everything after `fs//`, so the root filesystem is `fs///`.
pub struct FsSensor {
    metadata: SensorMetadata,
}

impl FsSensor {
    pub fn new() -> Self {
        Self {
            metadata: SensorMetadata::new("fs//.+", "Available space in file system"),
        }
    }

    fn path_of(token: &str) -> Option<&Path> {
        token.strip_prefix(FS_PREFIX).map(Path::new)
    }
}

impl Default for FsSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for FsSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn check(&self, token: &str) -> Result<bool, SensorError> {
        let Some(path) = Self::path_of(token) else {
            return Ok(false);
        };
        if path.as_os_str().is_empty() || !path.exists() {
            return Err(SensorError::PathNotFound(path.to_path_buf()));
        }
        Ok(true)
    }

    fn fetch(&self, token: &str, _ctx: &FetchContext) -> Result<String> {
        let value = Self::path_of(token)
            .and_then(available_bytes)
            .map(format_binary_size)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_check_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let sensor = FsSensor::new();
        let token = format!("fs//{}", dir.path().display());
        assert_eq!(sensor.check(&token), Ok(true));
        assert_eq!(sensor.check("fs///"), Ok(true));
    }

    #[test]
    fn test_check_missing_path_fails_before_fetch() {
        let sensor = FsSensor::new();
        assert_eq!(
            sensor.check("fs///definitely/not/here"),
            Err(SensorError::PathNotFound(PathBuf::from("/definitely/not/here")))
        );
    }

    #[test]
    fn test_not_fs_token() {
        let sensor = FsSensor::new();
        assert_eq!(sensor.check("fs"), Ok(false));
        assert_eq!(sensor.check("mem"), Ok(false));
    }

    #[test]
    fn test_fetch_root_reports_size() {
        let sensor = FsSensor::new();
        let value = sensor.fetch("fs///", &FetchContext::default()).unwrap();
        assert!(value.ends_with('B'), "unexpected value {}", value);
    }

    #[test]
    fn test_fetch_vanished_path_is_not_available() {
        let sensor = FsSensor::new();
        let value = sensor.fetch("fs///definitely/not/here", &FetchContext::default()).unwrap();
        assert_eq!(value, NOT_AVAILABLE);
    }
}
