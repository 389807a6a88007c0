use crate::errors::AppError;
use crate::models::SessionData;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

/// Where the session record and its daily-reset marker live.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data: PathBuf,
    pub last_date: PathBuf,
}

impl StoragePaths {
    pub fn new(data: PathBuf) -> Self {
        let stem = data
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state".to_string());
        let last_date = data.with_file_name(format!("{stem}.last-date"));
        Self { data, last_date }
    }
}

pub async fn load_data(path: &Path) -> Option<SessionData> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => Some(data),
            Err(err) => {
                error!("failed to parse data file: {err}");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read data file: {err}");
            None
        }
    }
}

/// Guest sessions are never written.
pub async fn persist_data(path: &Path, data: &SessionData) -> Result<(), AppError> {
    if !data.user.logged_in {
        return Ok(());
    }
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

pub async fn read_last_date(path: &Path) -> Option<NaiveDate> {
    let raw = fs::read_to_string(path).await.ok()?;
    raw.trim().parse().ok()
}

pub async fn write_last_date(path: &Path, date: NaiveDate) -> Result<(), AppError> {
    fs::write(path, date.format("%Y-%m-%d").to_string()).await?;
    Ok(())
}

/// Clears every habit's done flag when the last processed day is not `today`.
pub fn apply_daily_reset(data: &mut SessionData, last_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    if last_date == Some(today) {
        return false;
    }
    data.reset_habits();
    true
}

pub async fn load_session(paths: &StoragePaths, today: NaiveDate) -> Result<SessionData, AppError> {
    let mut data = load_data(&paths.data).await.unwrap_or_default();
    let last_date = read_last_date(&paths.last_date).await;

    if apply_daily_reset(&mut data, last_date, today) {
        info!(%today, "new day, habit checklist reset");
        write_last_date(&paths.last_date, today).await?;
        persist_data(&paths.data, &data).await?;
    }

    Ok(data)
}

pub async fn clear_data(paths: &StoragePaths) -> Result<(), AppError> {
    match fs::remove_file(&paths.data).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
