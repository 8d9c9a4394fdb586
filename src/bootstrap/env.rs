use std::path::PathBuf;

/// Loads `.env` into the process environment. Runs before tracing is set up,
/// so the outcome is handed back for logging instead of logged here.
pub async fn init_env() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
