use crate::errors::StorageError;
use crate::models::WeekInput;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Reads the stored raw figures for a week. A missing file is an empty week;
/// a file that exists but cannot be read or parsed is an error.
pub async fn load_week(path: &Path) -> Result<WeekInput, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no week file at {}, starting empty", path.display());
            return Ok(WeekInput::default());
        }
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let week: WeekInput = serde_json::from_slice(&bytes).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(days = week.days.len(), "loaded week file {}", path.display());
    Ok(week)
}
