use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, info, warn};

use super::entities::{SessionEntity, SessionRow, STORE_HEADER};

pub const STORE_FILE_NAME: &str = "focus_history.csv";

/// Interface for abstracting storage of sessions. The whole collection is always read and
/// written at once.
pub trait SessionStore {
    /// Reads every stored session. A store that doesn't exist yet is just empty.
    fn load_all(&self) -> impl Future<Output = Result<Vec<SessionEntity>>> + Send;

    /// Replaces the stored collection with `sessions`. Either the old or the new content survives,
    /// never a mix of both.
    fn replace_all(&self, sessions: &[SessionEntity]) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Deref> SessionStore for T
where
    T::Target: SessionStore,
{
    fn load_all(&self) -> impl Future<Output = Result<Vec<SessionEntity>>> + Send {
        self.deref().load_all()
    }

    fn replace_all(&self, sessions: &[SessionEntity]) -> impl Future<Output = Result<()>> + Send {
        self.deref().replace_all(sessions)
    }
}

/// The main realization of [SessionStore]. Keeps sessions in a single csv file.
pub struct CsvSessionStore {
    path: PathBuf,
}

impl CsvSessionStore {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent().filter(|v| !v.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Store placed into the application directory under its standard name.
    pub fn in_dir(dir: &Path) -> Result<Self, std::io::Error> {
        Self::new(dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|v| v.to_os_string())
            .unwrap_or_else(|| STORE_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

async fn read_locked(path: &Path) -> std::result::Result<Vec<u8>, std::io::Error> {
    debug!("Reading {path:?}");
    let mut file = File::open(path).await?;
    file.lock_shared()?;
    let mut content = vec![];
    let result = file.read_to_end(&mut content).await;
    file.unlock_async().await?;
    result?;
    Ok(content)
}

impl SessionStore for CsvSessionStore {
    async fn load_all(&self) -> Result<Vec<SessionEntity>> {
        let content = match read_locked(&self.path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No store at {:?} yet", self.path);
                return Ok(vec![]);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read store {:?}", self.path))
            }
        };

        parse_sessions(&content).with_context(|| format!("Store {:?} is corrupted", self.path))
    }

    async fn replace_all(&self, sessions: &[SessionEntity]) -> Result<()> {
        let buffer = serialize_sessions(sessions)?;

        // Held on the current store so readers finish before it gets swapped out.
        let store = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open store {:?}", self.path))?;
        store.lock_exclusive()?;
        let result = self.replace_locked(&buffer).await;
        store.unlock_async().await?;
        result?;

        info!("Stored {} sessions into {:?}", sessions.len(), self.path);
        Ok(())
    }
}

impl CsvSessionStore {
    /// Readers either see the previous file or the new one. Rename is atomic within a directory.
    async fn replace_locked(&self, buffer: &[u8]) -> Result<()> {
        let temp_path = self.temp_path();

        let written = match write_synced(&temp_path, buffer).await {
            Ok(_) => tokio::fs::rename(&temp_path, &self.path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                warn!("Failed to remove {temp_path:?}: {cleanup}");
            }
            return Err(e).with_context(|| format!("Failed to replace store {:?}", self.path));
        }
        Ok(())
    }
}

async fn write_synced(path: &Path, buffer: &[u8]) -> std::result::Result<(), std::io::Error> {
    let mut file = File::create(path).await?;
    file.write_all(buffer).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

/// Parses store content. Any malformed row fails the whole read, guessing would only spread the
/// corruption on the next write.
pub fn parse_sessions(content: &[u8]) -> Result<Vec<SessionEntity>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let mut sessions = vec![];
    for (index, row) in reader.deserialize::<SessionRow>().enumerate() {
        // +2 accounts for the header and 1-based line numbers.
        let row = row.with_context(|| format!("Malformed row on line {}", index + 2))?;
        sessions.push(SessionEntity::from(row));
    }
    Ok(sessions)
}

/// Serializes sessions with a header row, even when there are no sessions.
pub fn serialize_sessions(sessions: &[SessionEntity]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    writer.write_record(STORE_HEADER)?;
    for session in sessions {
        writer.serialize(SessionRow::from(session))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush csv buffer: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use tempfile::tempdir;

    use crate::{
        storage::{
            entities::SessionEntity,
            session_store::{parse_sessions, CsvSessionStore, SessionStore},
        },
        utils::logging::TEST_LOGGING,
    };

    const TEST_START_DATE: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
    );

    fn session(started_at: NaiveDateTime, duration_minutes: u32, category: &str) -> SessionEntity {
        SessionEntity {
            started_at,
            duration_minutes,
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn test_missing_store_is_empty() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = CsvSessionStore::in_dir(dir.path())?;

        assert!(store.load_all().await?.is_empty());
        assert!(!store.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_store_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvSessionStore::in_dir(dir.path())?;
        let sessions = vec![
            session(TEST_START_DATE, 25, "🌱 嫩芽"),
            session(TEST_START_DATE + chrono::Duration::hours(5), 45, "🌵 仙人掌"),
            session(
                TEST_START_DATE + chrono::Duration::days(3),
                30,
                "label, with \"quotes\"",
            ),
        ];

        store.replace_all(&sessions).await?;
        let mut stored = store.load_all().await?;
        stored.sort();

        let mut expected = sessions.clone();
        expected.sort();
        assert_eq!(stored, expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_file_layout() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvSessionStore::in_dir(dir.path())?;
        store
            .replace_all(&[session(TEST_START_DATE, 25, "🌻 向日葵")])
            .await?;

        let content = std::fs::read_to_string(store.path())?;
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "date,start_time,duration_minutes,plant_type,day_of_week,hour_of_day",
                "2024-01-01,09:15:00,25,🌻 向日葵,Monday,9",
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_store_keeps_header() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvSessionStore::in_dir(dir.path())?;
        store.replace_all(&[]).await?;

        let content = std::fs::read_to_string(store.path())?;
        assert_eq!(content.lines().count(), 1);
        assert!(store.load_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_leaves_no_temp_file() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvSessionStore::in_dir(dir.path())?;
        store.replace_all(&[session(TEST_START_DATE, 25, "🌲 松树")]).await?;
        store.replace_all(&[]).await?;

        let files = std::fs::read_dir(dir.path())?.collect::<Vec<_>>();
        assert_eq!(files.len(), 1);
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_failed_replace_removes_temp_file() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvSessionStore::in_dir(dir.path())?;
        store.replace_all(&[session(TEST_START_DATE, 25, "🌲 松树")]).await?;
        let before = std::fs::read(store.path())?;

        // Every write into /dev/full fails with ENOSPC.
        let temp_path = dir.path().join("focus_history.csv.tmp");
        std::os::unix::fs::symlink("/dev/full", &temp_path)?;

        assert!(store
            .replace_all(&[session(TEST_START_DATE, 50, "🌵 仙人掌")])
            .await
            .is_err());

        assert!(std::fs::symlink_metadata(&temp_path).is_err());
        assert_eq!(std::fs::read(store.path())?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_store_fails() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvSessionStore::in_dir(dir.path())?;
        std::fs::write(
            store.path(),
            "date,start_time,duration_minutes,plant_type,day_of_week,hour_of_day\n\
             2024-01-01,09:00:00,not a number,🌱 嫩芽,Monday,9\n",
        )?;

        let error = store.load_all().await.unwrap_err();
        assert!(format!("{error:?}").contains("line 2"));
        Ok(())
    }

    #[test]
    fn test_parse_unpadded_hours() -> Result<()> {
        let sessions = parse_sessions(
            "date,start_time,duration_minutes,plant_type,day_of_week,hour_of_day\n\
             2024-01-02,9:00:00,31,🌲 松树,Tuesday,9\n"
                .as_bytes(),
        )?;

        assert_eq!(
            sessions,
            vec![SessionEntity {
                started_at: NaiveDate::from_ymd_opt(2024, 1, 2)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                duration_minutes: 31,
                category: Arc::from("🌲 松树"),
            }]
        );
        Ok(())
    }
}
