//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::warn;

/// Warn when the static asset directory is missing; the API keeps working
/// but the bundled frontend will 404.
pub async fn ensure_env(static_dir: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{static_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%static_dir, "static assets directory not found; frontend pages may 404");
            Ok(())
        }
    }
}
