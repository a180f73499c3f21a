//! Position source
//!
//! Drives a [`SensorPort`] through the permission prompt, the initial
//! one-shot fix and the continuous watch, and hands every outcome to a
//! callback. The returned [`PositionSubscription`] ends the watch; once
//! `stop` returns the callback is never invoked again.

use std::sync::Arc;

use domain::Fix;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use crate::ports::{PermissionStatus, SensorError, SensorPort, WatchOptions};

/// Something the sensor reported
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    /// The user granted location permission
    PermissionGranted,
    /// The user refused, or later revoked, location permission
    PermissionDenied,
    /// A new fix, in arrival order
    Fix(Fix),
    /// The sensor failed to produce a fix
    Unavailable(String),
}

impl From<SensorError> for SensorEvent {
    fn from(err: SensorError) -> Self {
        match err {
            SensorError::PermissionDenied => Self::PermissionDenied,
            SensorError::Unavailable(detail) => Self::Unavailable(detail),
        }
    }
}

/// Adapter over the location sensor
#[derive(Clone)]
pub struct PositionSource {
    sensor: Arc<dyn SensorPort>,
    options: WatchOptions,
}

impl std::fmt::Debug for PositionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionSource")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PositionSource {
    /// Create a position source for the given sensor
    #[must_use]
    pub fn new(sensor: Arc<dyn SensorPort>, options: WatchOptions) -> Self {
        Self { sensor, options }
    }

    /// Watch parameters passed to the sensor
    #[must_use]
    pub const fn options(&self) -> WatchOptions {
        self.options
    }

    /// Start tracking
    ///
    /// Permission is requested first. A refusal is reported once as
    /// [`SensorEvent::PermissionDenied`] and nothing else follows. Otherwise
    /// the one-shot current fix is delivered, then every fix from the watch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, on_event: F) -> PositionSubscription
    where
        F: Fn(SensorEvent) + Send + Sync + 'static,
    {
        let active = Arc::new(Mutex::new(true));
        let gate = Arc::clone(&active);
        let deliver = move |event: SensorEvent| {
            let open = gate.lock();
            if *open {
                on_event(event);
            }
        };

        let sensor = Arc::clone(&self.sensor);
        let options = self.options;
        let task = tokio::spawn(
            async move {
                if sensor.request_permission().await == PermissionStatus::Denied {
                    info!("Location permission denied");
                    deliver(SensorEvent::PermissionDenied);
                    return;
                }
                info!("Location permission granted");
                deliver(SensorEvent::PermissionGranted);

                match sensor.current_fix().await {
                    Ok(fix) => deliver(SensorEvent::Fix(fix)),
                    Err(SensorError::PermissionDenied) => {
                        deliver(SensorEvent::PermissionDenied);
                        return;
                    },
                    Err(SensorError::Unavailable(detail)) => {
                        warn!(%detail, "Initial fix unavailable");
                        deliver(SensorEvent::Unavailable(detail));
                    },
                }

                let mut fixes = match sensor.watch(options).await {
                    Ok(stream) => stream,
                    Err(err) => {
                        warn!(error = %err, "Failed to start location watch");
                        deliver(err.into());
                        return;
                    },
                };

                while let Some(item) = fixes.next().await {
                    match item {
                        Ok(fix) => deliver(SensorEvent::Fix(fix)),
                        Err(SensorError::PermissionDenied) => {
                            warn!("Location permission revoked");
                            deliver(SensorEvent::PermissionDenied);
                            return;
                        },
                        Err(SensorError::Unavailable(detail)) => {
                            deliver(SensorEvent::Unavailable(detail));
                        },
                    }
                }
                debug!("Location watch ended");
            }
            .in_current_span(),
        );

        PositionSubscription {
            active,
            task: Some(task),
        }
    }
}

/// Handle to a running position watch
///
/// Dropping the handle stops the watch.
#[derive(Debug)]
pub struct PositionSubscription {
    active: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl PositionSubscription {
    /// Stop the watch
    ///
    /// Waits for a callback that is currently running to return. No callback
    /// starts after this returns.
    pub fn stop(&mut self) {
        *self.active.lock() = false;
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Position subscription stopped");
        }
    }

    /// Whether the subscription still delivers events
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }
}

impl Drop for PositionSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}
