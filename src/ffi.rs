//! FFI bindings for mobile platforms (iOS/Android)
//!
//! Thin shims over the process-wide recorder session. The mobile screen
//! drives the lifecycle, forwards location callbacks, and collects the
//! transfer JSON once recording stops. Errors cross the boundary as
//! messages inside result records; they are surfaced, never swallowed.

use log::info;

use crate::recorder::{begin_recording, clear_session, with_recorder, RecorderState};
use crate::route::{InterestPoint, Route, TrackPoint};
use crate::{init_logging, GpsPoint};

#[cfg(feature = "http")]
use crate::http::{RouteSubmitter, SubmitResult};

// ============================================================================
// Result Records
// ============================================================================

/// Outcome of a lifecycle call, with the state after the call
#[derive(Debug, Clone, uniffi::Record)]
pub struct LifecycleResult {
    pub success: bool,
    /// Recorder state after the call ("created", "running", "paused",
    /// "stopped", or "none" when no session is active)
    pub state: String,
    pub error: Option<String>,
}

/// Outcome of exporting the finalized route
#[derive(Debug, Clone, uniffi::Record)]
pub struct ExportResult {
    pub route_id: String,
    /// Transfer representation as JSON; empty on failure
    pub json: String,
    pub success: bool,
    pub error: Option<String>,
}

fn current_state_str() -> String {
    with_recorder(|r| Ok(r.state().as_str().to_string())).unwrap_or_else(|_| "none".to_string())
}

fn current_route_id() -> String {
    with_recorder(|r| Ok(r.route().id().to_string())).unwrap_or_default()
}

fn lifecycle_result(outcome: crate::Result<()>) -> LifecycleResult {
    match outcome {
        Ok(()) => LifecycleResult {
            success: true,
            state: current_state_str(),
            error: None,
        },
        Err(e) => LifecycleResult {
            success: false,
            state: current_state_str(),
            error: Some(e.to_string()),
        },
    }
}

// ============================================================================
// Session Exports
// ============================================================================

/// Initialize logging (call once at app startup)
#[uniffi::export]
pub fn recorder_init() {
    init_logging();
    info!("[RouteRecorder] FFI initialized");
}

/// Begin a new recording session and return its route id.
///
/// Replaces any previous session. An empty name selects the default
/// metadata set (date-derived name, empty description).
#[uniffi::export]
pub fn recorder_begin(name: String, description: String) -> String {
    init_logging();
    let route = if name.trim().is_empty() {
        Route::untitled()
    } else {
        Route::new(name, description, chrono::Utc::now())
    };
    begin_recording(route)
}

/// Start the active session
#[uniffi::export]
pub fn recorder_start() -> LifecycleResult {
    lifecycle_result(with_recorder(|r| r.start()))
}

/// Pause the active session
#[uniffi::export]
pub fn recorder_pause() -> LifecycleResult {
    lifecycle_result(with_recorder(|r| r.pause()))
}

/// Resume the active session
#[uniffi::export]
pub fn recorder_resume() -> LifecycleResult {
    lifecycle_result(with_recorder(|r| r.resume()))
}

/// Stop the active session and finalize its route
#[uniffi::export]
pub fn recorder_stop() -> LifecycleResult {
    lifecycle_result(with_recorder(|r| r.stop()))
}

/// Feed one location sample; returns true when it was appended.
///
/// Off-state and malformed samples are discarded, matching the location
/// callback contract: the provider must never see an error.
#[uniffi::export]
pub fn recorder_add_location(
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    timestamp: i64,
) -> bool {
    let sample = TrackPoint {
        position: GpsPoint::new(latitude, longitude),
        altitude,
        timestamp,
    };
    with_recorder(|r| Ok(r.add_location(sample))).unwrap_or(false)
}

/// Add an interest point at the supplied position.
///
/// The position is the last known device location resolved by the caller.
/// A blank description counts as absent.
#[uniffi::export]
pub fn recorder_add_interest_point(
    latitude: f64,
    longitude: f64,
    title: String,
    description: Option<String>,
) -> LifecycleResult {
    let description = description.filter(|d| !d.trim().is_empty());
    lifecycle_result(with_recorder(|r| {
        let point = InterestPoint::new(GpsPoint::new(latitude, longitude), title, description)?;
        r.add_interest_point(point)
    }))
}

/// Whether the active session is running
#[uniffi::export]
pub fn recorder_is_running() -> bool {
    with_recorder(|r| Ok(r.is_running())).unwrap_or(false)
}

/// Whether the active session is paused
#[uniffi::export]
pub fn recorder_is_paused() -> bool {
    with_recorder(|r| Ok(r.is_paused())).unwrap_or(false)
}

/// Current session state ("none" when no session is active)
#[uniffi::export]
pub fn recorder_state() -> String {
    current_state_str()
}

/// Number of trajectory samples recorded so far
#[uniffi::export]
pub fn recorder_track_point_count() -> u32 {
    with_recorder(|r| Ok(r.route().track_points().len() as u32)).unwrap_or(0)
}

/// Number of interest points recorded so far
#[uniffi::export]
pub fn recorder_interest_point_count() -> u32 {
    with_recorder(|r| Ok(r.route().interest_points().len() as u32)).unwrap_or(0)
}

/// Total trajectory length in meters
#[uniffi::export]
pub fn recorder_total_distance() -> f64 {
    with_recorder(|r| Ok(r.route().total_distance())).unwrap_or(0.0)
}

/// Export the stopped session's route as transfer JSON.
///
/// Fails while the session is still live; the route is finalized by
/// `recorder_stop` first.
#[uniffi::export]
pub fn recorder_export_json() -> ExportResult {
    let exported = with_recorder(|r| {
        if r.state() != RecorderState::Stopped {
            return Err(crate::RecorderError::InvalidTransition {
                from: r.state(),
                operation: "export the route",
            });
        }
        let json = r.route().to_transfer_representation()?.to_json()?;
        Ok((r.route().id().to_string(), json))
    });

    match exported {
        Ok((route_id, json)) => ExportResult {
            route_id,
            json,
            success: true,
            error: None,
        },
        Err(e) => ExportResult {
            route_id: current_route_id(),
            json: String::new(),
            success: false,
            error: Some(e.to_string()),
        },
    }
}

/// Drop the active session, if any. Returns whether one existed.
#[uniffi::export]
pub fn recorder_clear() -> bool {
    clear_session()
}

/// Submit the stopped session's route to the backend.
///
/// Builds the transfer representation under the session lock, then
/// releases it before any network traffic. On failure the result carries
/// the payload for the caller to persist.
#[cfg(feature = "http")]
#[uniffi::export]
pub fn recorder_submit_route(
    endpoint: String,
    bearer_token: Option<String>,
) -> SubmitResult {
    let exported = with_recorder(|r| {
        if r.state() != RecorderState::Stopped {
            return Err(crate::RecorderError::InvalidTransition {
                from: r.state(),
                operation: "submit the route",
            });
        }
        r.route().to_transfer_representation()
    });

    let transfer = match exported {
        Ok(t) => t,
        Err(e) => {
            return SubmitResult {
                route_id: current_route_id(),
                success: false,
                status: None,
                error: Some(e.to_string()),
                payload: None,
            };
        }
    };

    let submitter = match &bearer_token {
        Some(token) => RouteSubmitter::with_bearer_token(endpoint, token),
        None => RouteSubmitter::new(endpoint),
    };
    match submitter {
        Ok(s) => s.submit_blocking(&transfer),
        Err(e) => SubmitResult {
            route_id: transfer.id.clone(),
            success: false,
            status: None,
            error: Some(e.to_string()),
            payload: None,
        },
    }
}
