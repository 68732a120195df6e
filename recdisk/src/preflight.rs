//! Startup checks run before any command.

use crate::config::Config;
use crate::errors::RecdiskError;
use recdisk_hal::HostInfoOps;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub fn run<H: HostInfoOps + ?Sized>(hal: &H, cfg: &Config) -> Result<(), RecdiskError> {
    for tool in &cfg.required_tools {
        if find_executable_in_path(tool, &cfg.path_env).is_none() {
            return Err(RecdiskError::NoTools(tool.clone()));
        }
        log::debug!("found {}", tool);
    }

    if !hal.is_root() {
        return Err(RecdiskError::NoPermissions);
    }
    Ok(())
}

fn find_executable_in_path(binary: &str, path_env: &str) -> Option<PathBuf> {
    for dir in path_env.split(':').filter(|dir| !dir.is_empty()) {
        let candidate = Path::new(dir).join(binary);
        if let Ok(metadata) = fs::metadata(&candidate) {
            if metadata.is_file() && metadata.permissions().mode() & 0o111 != 0 {
                return Some(candidate);
            }
        }
    }
    None
}
