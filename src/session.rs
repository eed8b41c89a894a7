//! Latest-request-wins wrapper around [`StatementEngine`].
//!
//! Switching months quickly can leave several computations in flight. Each
//! request takes a monotonically increasing token; when a computation finishes
//! it is applied only if no newer request has been made since.

use crate::engine::StatementEngine;
use crate::error::Result;
use crate::schema::StatementResult;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The statement is now the displayed one.
    Applied(StatementResult),
    /// A newer request was issued while this one ran; its result was discarded.
    Superseded { period: String },
}

pub struct StatementSession {
    engine: StatementEngine,
    latest_token: AtomicU64,
    current: Mutex<Option<StatementResult>>,
}

impl StatementSession {
    pub fn new(engine: StatementEngine) -> Self {
        Self {
            engine,
            latest_token: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &StatementEngine {
        &self.engine
    }

    /// Computes `period` and makes it current unless a newer request exists.
    ///
    /// An invalid period still counts as the newest request, so any older
    /// computation still running will be discarded when it completes.
    pub async fn request(&self, period: &str) -> Result<RequestOutcome> {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        let statement = self.engine.compute(period).await?;

        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if token != self.latest_token.load(Ordering::SeqCst) {
            debug!(
                "Discarding stale statement for {} (token {})",
                statement.period, token
            );
            return Ok(RequestOutcome::Superseded {
                period: statement.period,
            });
        }

        *current = Some(statement.clone());
        Ok(RequestOutcome::Applied(statement))
    }

    /// The statement of the most recent request that completed while still current.
    pub fn current(&self) -> Option<StatementResult> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
