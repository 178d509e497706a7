//! Copying prepared datasets to a remote (HDFS) or local mirror directory.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Whether `path` names a location that must go through the `hdfs` CLI.
pub fn is_remote(path: &str) -> bool {
    path.starts_with("hdfs://")
}

fn hdfs(args: &[&str]) -> Result<()> {
    debug!("hdfs {}", args.join(" "));
    let output = Command::new("hdfs")
        .args(args)
        .output()
        .context("Failed to run hdfs")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("hdfs {} failed: {}", args.join(" "), stderr);
    }
    Ok(())
}

/// Create `dir` (and parents) on HDFS or the local filesystem.
pub fn makedirs(dir: &str) -> Result<()> {
    if is_remote(dir) {
        hdfs(&["dfs", "-mkdir", "-p", dir])
    } else {
        let dir = shellexpand::tilde(dir).into_owned();
        std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir))
    }
}

/// Copy the contents of local directory `src` into `dst`.
pub fn copy(src: &Path, dst: &str) -> Result<()> {
    if is_remote(dst) {
        for entry in std::fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
            let path = entry?.path();
            let path = path.to_string_lossy();
            hdfs(&["dfs", "-put", "-f", path.as_ref(), dst])?;
        }
    } else {
        let dst = shellexpand::tilde(dst).into_owned();
        copy_dir(src, Path::new(&dst))?;
    }
    info!("Copied {} to {}", src.display(), dst);
    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create {}", dst.display()))?;

    for entry in std::fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
        let entry = entry?;
        let path = entry.path();
        let target = dst.join(entry.file_name());
        if path.is_dir() {
            copy_dir(&path, &target)?;
        } else {
            std::fs::copy(&path, &target)
                .with_context(|| format!("Failed to copy {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_hdfs_urls() {
        assert!(is_remote("hdfs://namenode/data/crag"));
        assert!(!is_remote("/mnt/shared/crag"));
        assert!(!is_remote("~/backup"));
    }

    #[test]
    fn local_copy_is_recursive() {
        let src = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("train.parquet"), b"t").unwrap();
        std::fs::create_dir(src.path().join("raw")).unwrap();
        std::fs::write(src.path().join("raw").join("split.json"), b"[]").unwrap();

        let dst = tempfile::tempdir().unwrap();
        let target = dst.path().join("mirror");
        let target = target.to_str().unwrap();
        makedirs(target).unwrap();
        copy(src.path(), target).unwrap();

        assert_eq!(std::fs::read(dst.path().join("mirror/train.parquet")).unwrap(), b"t");
        assert_eq!(std::fs::read(dst.path().join("mirror/raw/split.json")).unwrap(), b"[]");
    }
}
