//! # External Tool Invocations (`common::archive::tools`)
//!
//! File: cli/src/common/archive/tools.rs
//!
//! ## Overview
//!
//! gzbundle never compresses or encodes archives itself. It drives `gzip` and
//! `tar` with the same flags a user would type, so the results interoperate
//! with standard Unix tooling:
//!
//! | Step        | Invocation                              |
//! |-------------|-----------------------------------------|
//! | compress    | `gzip -k -f <path>` → `<path>.gz`        |
//! | decompress  | `gzip -d -f <path>.gz` → `<path>`        |
//! | bundle      | `tar -cf <archive> <file>...`            |
//! | unbundle    | `tar -xf <archive> -C <output_dir>`      |
//!
//! Compression jobs are handed to a `Throttle`; the bundle and unbundle steps
//! run synchronously outside any pool.
//!
use crate::common::process::{ChildProcess, Throttle};
use crate::core::error::Result;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension gzip gives to the files it writes.
pub const COMPRESSED_EXTENSION: &str = "gz";

/// Programs used for compression and bundling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub gzip: String,
    pub tar: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            gzip: "gzip".to_string(),
            tar: "tar".to_string(),
        }
    }
}

impl Toolchain {
    /// Schedules `gzip -k -f <path>` and returns the temporary it will write.
    pub fn schedule_compression(&self, throttle: &mut Throttle, path: &Path) -> Result<PathBuf> {
        throttle.schedule(&self.gzip, [OsStr::new("-k"), OsStr::new("-f"), path.as_os_str()])?;
        Ok(compressed_path_for(path))
    }

    /// Schedules `gzip -d -f <path>`, which replaces `<path>` with its decompressed form.
    pub fn schedule_decompression(&self, throttle: &mut Throttle, path: &Path) -> Result<()> {
        throttle.schedule(&self.gzip, [OsStr::new("-d"), OsStr::new("-f"), path.as_os_str()])?;
        Ok(())
    }

    /// Runs `tar -cf <archive> <file>...` to completion.
    pub fn bundle(&self, archive: &Path, files: &[PathBuf]) -> Result<()> {
        let mut args: Vec<OsString> = vec!["-cf".into(), archive.as_os_str().to_owned()];
        args.extend(files.iter().map(|f| f.as_os_str().to_owned()));

        info!("Bundling {} files into {:?}", files.len(), archive);
        ChildProcess::spawn(&self.tar, &args)?.wait_success()
    }

    /// Runs `tar -xf <archive> -C <output_dir>` to completion.
    pub fn unbundle(&self, archive: &Path, output_dir: &Path) -> Result<()> {
        info!("Unbundling {:?} into {:?}", archive, output_dir);
        ChildProcess::spawn(
            &self.tar,
            [
                OsStr::new("-xf"),
                archive.as_os_str(),
                OsStr::new("-C"),
                output_dir.as_os_str(),
            ],
        )?
        .wait_success()
    }
}

/// `<path>.gz`, the name gzip writes next to `path`.
pub fn compressed_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(COMPRESSED_EXTENSION);
    PathBuf::from(name)
}


// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::Outcome;
    use crate::core::error::GzbundleError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_compressed_path_for() {
        assert_eq!(
            compressed_path_for(Path::new("dir/report.txt")),
            PathBuf::from("dir/report.txt.gz")
        );
        assert_eq!(
            compressed_path_for(Path::new("noext")),
            PathBuf::from("noext.gz")
        );
    }

    #[test]
    fn test_compress_then_decompress_in_place() -> Result<()> {
        let temp_dir = tempdir()?;
        let source = temp_dir.path().join("notes.txt");
        fs::write(&source, "some text worth compressing")?;
        let tools = Toolchain::default();

        let mut throttle = Throttle::new(1)?;
        let temporary = tools.schedule_compression(&mut throttle, &source)?;
        throttle.finish()?.into_result()?;

        assert_eq!(temporary, temp_dir.path().join("notes.txt.gz"));
        assert!(temporary.is_file());
        assert!(source.is_file(), "-k keeps the original");

        fs::remove_file(&source)?;
        tools.schedule_decompression(&mut throttle, &temporary)?;
        throttle.finish()?.into_result()?;

        assert!(!temporary.exists());
        assert_eq!(fs::read_to_string(&source)?, "some text worth compressing");
        Ok(())
    }

    #[test]
    fn test_unbundle_failure_is_process_failure() -> Result<()> {
        let temp_dir = tempdir()?;
        let archive = temp_dir.path().join("broken.tar");
        fs::write(&archive, "this is not a tar archive at all")?;

        let err = Toolchain::default()
            .unbundle(&archive, temp_dir.path())
            .unwrap_err();

        match err.downcast_ref::<GzbundleError>() {
            Some(GzbundleError::ProcessFailure { outcome, .. }) => {
                assert_ne!(*outcome, Outcome::Success)
            }
            other => panic!("unexpected error: {:?}", other),
        }
        Ok(())
    }
}
