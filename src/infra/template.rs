//! Infrastructure implementation of the `TemplateMaterializer` port.
//!
//! `FsMaterializer` clones the template tree into a fresh instance directory
//! and removes instance directories wholesale on destroy. Blocking
//! filesystem work runs on the tokio blocking pool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::TemplateMaterializer;
use crate::domain::error::MaterializeError;
use crate::domain::instance::validate_instance_name;

/// Filesystem-backed template materializer.
pub struct FsMaterializer {
    template_dir: PathBuf,
    instances_dir: PathBuf,
}

impl FsMaterializer {
    #[must_use]
    pub fn new(template_dir: PathBuf, instances_dir: PathBuf) -> Self {
        Self {
            template_dir,
            instances_dir,
        }
    }
}

fn create_sync(template: &Path, instances: &Path, name: &str) -> Result<PathBuf, MaterializeError> {
    validate_instance_name(name)?;
    if !template.is_dir() {
        return Err(MaterializeError::TemplateMissing(template.to_path_buf()));
    }

    std::fs::create_dir_all(instances)?;
    let dest = instances.join(name);
    // `create_dir` is the uniqueness check: two concurrent creates for the
    // same name cannot both succeed.
    if let Err(e) = std::fs::create_dir(&dest) {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            return Err(MaterializeError::InstanceExists(name.to_string()));
        }
        return Err(MaterializeError::Io(e));
    }

    if let Err(e) = copy_tree(template, &dest) {
        // A half-built instance must not survive its own create failure.
        let _ = std::fs::remove_dir_all(&dest);
        return Err(e);
    }
    Ok(dest)
}

/// Recursively copy `src` into `dest`, preserving permissions.
///
/// A destination subdirectory colliding with a template subdirectory is
/// replaced wholesale — last write wins, never a merge.
fn copy_tree(src: &Path, dest: &Path) -> Result<(), MaterializeError> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            if dest_path.exists() {
                std::fs::remove_dir_all(&dest_path)?;
            }
            std::fs::create_dir(&dest_path)?;
            copy_tree(&src_path, &dest_path)?;
            let perms = std::fs::metadata(&src_path)?.permissions();
            std::fs::set_permissions(&dest_path, perms)?;
        } else {
            std::fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}

fn destroy_sync(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    std::fs::remove_dir_all(dir)
        .with_context(|| format!("removing instance directory {}", dir.display()))
}

impl TemplateMaterializer for FsMaterializer {
    async fn create(&self, name: &str) -> Result<PathBuf, MaterializeError> {
        let template = self.template_dir.clone();
        let instances = self.instances_dir.clone();
        let name = name.to_owned();
        tokio::task::spawn_blocking(move || create_sync(&template, &instances, &name))
            .await
            .map_err(|e| MaterializeError::Io(std::io::Error::other(e)))?
    }

    async fn destroy(&self, dir: &Path) -> Result<()> {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || destroy_sync(&dir))
            .await
            .context("destroy task panicked")?
    }
}
