//! Version string recorded on the framework: `<package version>+<short revision>`.

use crate::config::{PACKAGE_VERSION, SetupConfig};
use crate::error::ConfigError;

/// Length of the abbreviated source revision.
pub const SHORT_REVISION_LEN: usize = 7;

pub fn version_string(package_version: &str, revision: &str) -> Result<String, ConfigError> {
    let package_version = package_version.trim();
    if package_version.is_empty() {
        return Err(ConfigError::InvalidVar {
            name: PACKAGE_VERSION,
            value: String::new(),
            reason: "empty".into(),
        });
    }

    let revision = revision.trim();
    let short = revision
        .get(..SHORT_REVISION_LEN)
        .filter(|s| s.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| ConfigError::Revision(format!("{revision:?} is not a commit hash")))?;

    Ok(format!("{package_version}+{}", short.to_ascii_lowercase()))
}

/// `git rev-parse HEAD` in the current directory.
pub async fn current_revision() -> Result<String, ConfigError> {
    let output = tokio::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .await
        .map_err(|e| ConfigError::Revision(format!("cannot run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConfigError::Revision(stderr.trim().to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Uses the configured revision, falling back to git.
pub async fn resolve_version(config: &SetupConfig) -> Result<String, ConfigError> {
    let revision = match &config.source_revision {
        Some(revision) => revision.clone(),
        None => current_revision().await?,
    };
    version_string(&config.package_version, &revision)
}
