//! # Route Recorder
//!
//! GPS route recording for activity tracking: a lifecycle state machine that
//! turns a live stream of position samples into an ordered, serializable
//! route record.
//!
//! This library provides:
//! - The [`Route`] data model (trajectory, interest points, metadata)
//! - The [`RouteRecorder`] state machine (start / pause / resume / stop)
//! - A transfer representation for backend submission
//! - Optional HTTP submission and mobile FFI layers
//!
//! ## Features
//!
//! - **`ffi`** - FFI bindings for mobile platforms (iOS/Android)
//! - **`http`** - HTTP client for submitting finished routes
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use route_recorder::{Route, RouteRecorder, TrackPoint};
//!
//! let mut recorder = RouteRecorder::new(Route::new("Morning loop", "", chrono::Utc::now()));
//! recorder.start().unwrap();
//! assert!(recorder.add_location(TrackPoint::new(48.8566, 2.3522, 1_718_000_000_000)));
//! recorder.stop().unwrap();
//!
//! let transfer = recorder.route().to_transfer_representation().unwrap();
//! assert_eq!(transfer.trajectory.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{RecorderError, Result};

// Geographic utilities (haversine distance, trajectory length)
pub mod geo_utils;

// Route data model (trajectory + interest points)
pub mod route;
pub use route::{InterestPoint, Route, TrackPoint};

// Recording state machine and the process-wide session slot
pub mod recorder;
pub use recorder::{
    begin_recording, clear_session, take_finished_route, with_recorder, RecorderState,
    RouteRecorder, ACTIVE_RECORDER,
};

// Transfer representation handed to the sync collaborator
pub mod transfer;
pub use transfer::{RouteTransfer, TransferInterestPoint, TransferTrackPoint};

// HTTP submission of finished routes
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub use http::{RouteSubmitter, SubmitResult};

// FFI bindings for mobile platforms
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid GPS coordinates
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("RouteRecorderRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}
