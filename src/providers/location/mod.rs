//! Device geolocation as an injectable collaborator.
//!
//! The host platform (browser shell, mobile shell, test double) supplies a
//! [`PositionSource`]. Acquisition runs as a bounded watch: keep the most
//! accurate fix seen so far, stop early once a fix is accurate enough, and
//! at the deadline settle for the best fix or fall back to a one-shot
//! query. The watch is torn down on every exit path, and a new acquisition
//! supersedes one still in flight instead of queueing behind it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;
use tracing::debug;

use crate::config::GeolocationConfig;
use crate::models::LatLng;

/// A position fix with its reported accuracy radius in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub position: LatLng,
    pub accuracy_m: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Geolocation unavailable: {0}")]
    Unavailable(String),
    #[error("No position fix within the deadline")]
    Timeout,
    #[error("Superseded by a newer location request")]
    Superseded,
}

pub type WatchEvent = Result<PositionFix, LocationError>;

/// Stream of fixes from a running platform watch. Dropping it closes the
/// channel; the platform side must treat the closed channel as teardown.
pub struct PositionWatch {
    pub events: mpsc::Receiver<WatchEvent>,
}

/// Platform geolocation hooks.
pub trait PositionSource: Send + Sync + 'static {
    /// Begin a continuous watch.
    fn watch(&self) -> PositionWatch;
    /// One-shot position query, the fallback when a watch produced nothing.
    fn current_position(&self) -> oneshot::Receiver<WatchEvent>;
}

pub struct LocationService<S: PositionSource> {
    source: Arc<S>,
    config: GeolocationConfig,
    cached: Mutex<Option<LatLng>>,
    inflight: Mutex<Option<AbortHandle>>,
}

impl<S: PositionSource> LocationService<S> {
    pub fn new(source: S, config: GeolocationConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
            cached: Mutex::new(None),
            inflight: Mutex::new(None),
        }
    }

    /// Last successfully acquired position. In-memory only: lost on
    /// restart, overwritten by each new fix.
    pub fn cached(&self) -> Option<LatLng> {
        *lock(&self.cached)
    }

    /// Acquire the device position. A call supersedes any acquisition
    /// still in flight; the superseded caller sees
    /// [`LocationError::Superseded`].
    pub async fn acquire(&self) -> Result<LatLng, LocationError> {
        let task = tokio::spawn(acquire_once(self.source.clone(), self.config.clone()));
        let previous = lock(&self.inflight).replace(task.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }

        let result = match task.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(LocationError::Superseded),
            Err(_) => Err(LocationError::Unavailable(
                "acquisition task failed".to_string(),
            )),
        };
        if let Ok(position) = &result {
            *lock(&self.cached) = Some(*position);
        }
        result
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn acquire_once<S: PositionSource>(
    source: Arc<S>,
    config: GeolocationConfig,
) -> Result<LatLng, LocationError> {
    let mut watch = source.watch();
    let deadline = tokio::time::sleep(Duration::from_millis(config.watch_deadline_ms));
    tokio::pin!(deadline);
    let mut best: Option<PositionFix> = None;

    loop {
        tokio::select! {
            event = watch.events.recv() => match event {
                Some(Ok(fix)) => {
                    if best.is_none_or(|b| fix.accuracy_m < b.accuracy_m) {
                        best = Some(fix);
                    }
                    if fix.accuracy_m <= config.accuracy_target_m {
                        debug!(accuracy_m = fix.accuracy_m, "Accurate fix, stopping the watch early");
                        return Ok(fix.position);
                    }
                }
                Some(Err(LocationError::PermissionDenied)) => {
                    return Err(LocationError::PermissionDenied);
                }
                // Transient errors: keep waiting while the deadline allows.
                Some(Err(err)) => debug!(error = %err, "Transient watch error"),
                None => {
                    return best
                        .map(|fix| fix.position)
                        .ok_or_else(|| LocationError::Unavailable(
                            "watch ended without a fix".to_string(),
                        ));
                }
            },
            _ = &mut deadline => {
                return match best {
                    Some(fix) => {
                        debug!(accuracy_m = fix.accuracy_m, "Deadline reached, using the best fix so far");
                        Ok(fix.position)
                    }
                    None => {
                        // Nothing at all from the watch: tear it down and
                        // try a single direct query.
                        drop(watch);
                        one_shot(&*source, config.one_shot_timeout_ms).await
                    }
                };
            }
        }
    }
}

async fn one_shot<S: PositionSource>(source: &S, timeout_ms: u64) -> Result<LatLng, LocationError> {
    let receiver = source.current_position();
    match tokio::time::timeout(Duration::from_millis(timeout_ms), receiver).await {
        Ok(Ok(Ok(fix))) => Ok(fix.position),
        Ok(Ok(Err(err))) => Err(err),
        Ok(Err(_)) => Err(LocationError::Unavailable(
            "position provider dropped the request".to_string(),
        )),
        Err(_) => Err(LocationError::Timeout),
    }
}
