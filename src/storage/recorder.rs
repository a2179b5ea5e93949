use anyhow::{ensure, Result};
use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::utils::{clock::Clock, time::trim_to_seconds};

use super::{entities::SessionEntity, session_store::SessionStore};

/// Bridges finished focus sessions and [SessionStore]. Every call reads the full collection,
/// appends one session and writes everything back.
pub struct Recorder<S: SessionStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: SessionStore> Recorder<S> {
    pub fn new(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Records a session stamped with the current wall-clock time. Returns the updated collection.
    pub async fn record_session(
        &self,
        duration_minutes: u32,
        category: &str,
    ) -> Result<Vec<SessionEntity>> {
        let started_at = self.clock.time().naive_local();
        self.record_session_started_at(started_at, duration_minutes, category)
            .await
    }

    /// Same as [Recorder::record_session] but with a known start of the session.
    #[instrument(skip(self))]
    pub async fn record_session_started_at(
        &self,
        started_at: NaiveDateTime,
        duration_minutes: u32,
        category: &str,
    ) -> Result<Vec<SessionEntity>> {
        let session = new_session(started_at, duration_minutes, category)?;

        let mut sessions = self.store.load_all().await?;
        sessions.push(session);
        self.store.replace_all(&sessions).await?;

        info!("Recorded session, {} in total", sessions.len());
        Ok(sessions)
    }
}

/// Validates input before it gets anywhere near the store.
pub fn new_session(
    started_at: NaiveDateTime,
    duration_minutes: u32,
    category: &str,
) -> Result<SessionEntity> {
    ensure!(
        duration_minutes > 0,
        "Session duration should be at least 1 minute"
    );
    ensure!(!category.trim().is_empty(), "Session category can't be empty");

    Ok(SessionEntity {
        started_at: trim_to_seconds(started_at),
        duration_minutes,
        category: category.trim().into(),
    })
}
