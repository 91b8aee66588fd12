//! Route recording state machine
//!
//! [`RouteRecorder`] owns a [`Route`] and decides when incoming samples and
//! annotations may reach it. Lifecycle misuse by the controlling caller is
//! a typed error; off-state location samples are a defined no-op, because
//! the upstream provider keeps emitting regardless of recorder state and
//! the recorder, not the source, decides relevance.
//!
//! ## Concurrency
//!
//! All mutating operations take `&mut self`: one logical writer, enforced
//! at compile time. When lifecycle calls and location callbacks arrive on
//! different threads (the FFI case), the whole recorder sits behind a
//! single mutex so a state check and the matching append are atomic. See
//! [`ACTIVE_RECORDER`] and [`with_recorder`].

use std::fmt;
use std::sync::Mutex;

use log::{debug, info};
use once_cell::sync::Lazy;

use crate::error::{RecorderError, Result};
use crate::route::{InterestPoint, Route, TrackPoint};

// ============================================================================
// Recorder State
// ============================================================================

/// Lifecycle state of a [`RouteRecorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Constructed, not yet recording
    Created,
    /// Recording; samples are appended
    Running,
    /// Suspended; samples are discarded, annotations still allowed
    Paused,
    /// Terminal; the route is finalized and read-only
    Stopped,
}

impl RecorderState {
    /// Lowercase name used in logs and FFI payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            RecorderState::Created => "created",
            RecorderState::Running => "running",
            RecorderState::Paused => "paused",
            RecorderState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Route Recorder
// ============================================================================

/// State machine that turns a live sample stream into a route record.
///
/// The recorder owns its [`Route`] exclusively until finalization:
/// [`RouteRecorder::into_route`] transfers ownership to the caller once the
/// recorder is stopped, and no mutation is possible afterwards.
pub struct RouteRecorder {
    route: Route,
    state: RecorderState,
}

impl RouteRecorder {
    /// Create a recorder owning `route`, in the `Created` state
    pub fn new(route: Route) -> Self {
        Self {
            route,
            state: RecorderState::Created,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Begin recording. Valid only from `Created`.
    ///
    /// Re-starting a running or stopped recorder is rejected, not silently
    /// ignored; the state is left unchanged.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            RecorderState::Created => {
                self.state = RecorderState::Running;
                info!("[RouteRecorder] Started recording route {}", self.route.id());
                Ok(())
            }
            from => Err(RecorderError::InvalidTransition {
                from,
                operation: "start",
            }),
        }
    }

    /// Suspend recording. Valid only from `Running`.
    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            RecorderState::Running => {
                self.state = RecorderState::Paused;
                info!("[RouteRecorder] Paused route {}", self.route.id());
                Ok(())
            }
            from => Err(RecorderError::InvalidTransition {
                from,
                operation: "pause",
            }),
        }
    }

    /// Resume a paused recording. Valid only from `Paused`.
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            RecorderState::Paused => {
                self.state = RecorderState::Running;
                info!("[RouteRecorder] Resumed route {}", self.route.id());
                Ok(())
            }
            from => Err(RecorderError::InvalidTransition {
                from,
                operation: "resume",
            }),
        }
    }

    /// Stop recording and finalize the route. Valid from `Running` or
    /// `Paused`.
    ///
    /// Afterwards the recorder is inert: every mutating call is rejected or
    /// discarded, and the route can only be read or taken via
    /// [`RouteRecorder::into_route`].
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            RecorderState::Running | RecorderState::Paused => {
                self.state = RecorderState::Stopped;
                info!(
                    "[RouteRecorder] Stopped route {} ({} track points, {} interest points)",
                    self.route.id(),
                    self.route.track_points().len(),
                    self.route.interest_points().len()
                );
                Ok(())
            }
            from => Err(RecorderError::InvalidTransition {
                from,
                operation: "stop",
            }),
        }
    }

    // ========================================================================
    // Samples and Annotations
    // ========================================================================

    /// Feed one location sample.
    ///
    /// Appends to the trajectory and returns `true` only while `Running`.
    /// In any other state the sample is accepted and discarded: the
    /// provider keeps emitting regardless of recorder state, and a callback
    /// arriving just before `start()` or after `stop()` must not fail the
    /// caller. Samples with out-of-range coordinates, and samples older
    /// than the last appended point, are discarded the same way.
    pub fn add_location(&mut self, sample: TrackPoint) -> bool {
        if self.state != RecorderState::Running {
            debug!("[RouteRecorder] Discarding sample while {}", self.state);
            return false;
        }
        if !sample.position.is_valid() {
            debug!(
                "[RouteRecorder] Discarding sample with invalid coordinates ({}, {})",
                sample.position.latitude, sample.position.longitude
            );
            return false;
        }
        if let Some(last) = self.route.track_points().last() {
            if sample.timestamp < last.timestamp {
                debug!(
                    "[RouteRecorder] Discarding out-of-order sample ({} < {})",
                    sample.timestamp, last.timestamp
                );
                return false;
            }
        }
        self.route.append_track_point(sample);
        true
    }

    /// Add a user interest point to the route.
    ///
    /// Accepted while `Running` or `Paused`; the user may annotate while
    /// standing still. In `Created` or `Stopped` there is no active route
    /// context to anchor the point to and the call fails.
    pub fn add_interest_point(&mut self, point: InterestPoint) -> Result<()> {
        match self.state {
            RecorderState::Running | RecorderState::Paused => {
                info!(
                    "[RouteRecorder] Added interest point '{}' to route {}",
                    point.title(),
                    self.route.id()
                );
                self.route.append_interest_point(point);
                Ok(())
            }
            from => Err(RecorderError::InvalidTransition {
                from,
                operation: "add an interest point",
            }),
        }
    }

    // ========================================================================
    // Queries and Finalization
    // ========================================================================

    /// Whether the recorder is currently running
    pub fn is_running(&self) -> bool {
        self.state == RecorderState::Running
    }

    /// Whether the recorder is currently paused
    pub fn is_paused(&self) -> bool {
        self.state == RecorderState::Paused
    }

    /// Current lifecycle state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Read access to the owned route
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Transfer ownership of the finalized route to the caller.
    ///
    /// Valid only after `stop()`. The recorder is consumed either way, so
    /// callers should check [`RouteRecorder::state`] first when they need
    /// to keep a non-stopped session alive.
    pub fn into_route(self) -> Result<Route> {
        match self.state {
            RecorderState::Stopped => Ok(self.route),
            from => Err(RecorderError::InvalidTransition {
                from,
                operation: "take the route",
            }),
        }
    }
}

// ============================================================================
// Process-Wide Session
// ============================================================================

/// Process-wide recorder slot.
///
/// Mobile embeddings drive one recording session at a time; FFI calls go
/// through this mutex so a state check and the matching append are atomic
/// even when lifecycle calls and location callbacks arrive on different
/// threads.
pub static ACTIVE_RECORDER: Lazy<Mutex<Option<RouteRecorder>>> = Lazy::new(|| Mutex::new(None));

/// Run `f` against the active recorder.
///
/// Fails with [`RecorderError::NoActiveSession`] when no session was begun.
pub fn with_recorder<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&mut RouteRecorder) -> Result<R>,
{
    let mut slot = ACTIVE_RECORDER.lock().unwrap();
    match slot.as_mut() {
        Some(recorder) => f(recorder),
        None => Err(RecorderError::NoActiveSession),
    }
}

/// Install a fresh recorder for `route`, replacing any previous session.
///
/// Returns the route id of the new session.
pub fn begin_recording(route: Route) -> String {
    let id = route.id().to_string();
    let mut slot = ACTIVE_RECORDER.lock().unwrap();
    if let Some(previous) = slot.as_ref() {
        info!(
            "[RouteRecorder] Replacing {} session for route {}",
            previous.state(),
            previous.route().id()
        );
    }
    *slot = Some(RouteRecorder::new(route));
    info!("[RouteRecorder] Began session for route {}", id);
    id
}

/// Remove a stopped session from the slot and hand its route to the caller.
///
/// The slot is left untouched when the session exists but is not stopped
/// yet.
pub fn take_finished_route() -> Result<Route> {
    let mut slot = ACTIVE_RECORDER.lock().unwrap();
    match slot.take() {
        None => Err(RecorderError::NoActiveSession),
        Some(recorder) if recorder.state() == RecorderState::Stopped => recorder.into_route(),
        Some(recorder) => {
            let err = RecorderError::InvalidTransition {
                from: recorder.state(),
                operation: "take the route",
            };
            *slot = Some(recorder);
            Err(err)
        }
    }
}

/// Drop the active session, if any. Returns whether one existed.
pub fn clear_session() -> bool {
    ACTIVE_RECORDER.lock().unwrap().take().is_some()
}
