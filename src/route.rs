//! Route data model
//!
//! A [`Route`] is the record of one recording session: identity and
//! metadata, the ordered trajectory of [`TrackPoint`] samples, and the
//! user's [`InterestPoint`] annotations. Both collections are append-only;
//! nothing is removed or reordered once inserted. The route itself enforces
//! no lifecycle rules, those live in [`RouteRecorder`](crate::RouteRecorder).

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::error::{RecorderError, Result};
use crate::geo_utils;
use crate::transfer::{RouteTransfer, TransferInterestPoint, TransferTrackPoint};
use crate::GpsPoint;

// ============================================================================
// Track Points
// ============================================================================

/// One recorded position sample. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    /// Sampled coordinates
    pub position: GpsPoint,
    /// Altitude in meters, when the provider reported one
    pub altitude: Option<f64>,
    /// Capture time as Unix epoch milliseconds
    pub timestamp: i64,
}

impl TrackPoint {
    /// Create a track point without altitude
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            position: GpsPoint::new(latitude, longitude),
            altitude: None,
            timestamp,
        }
    }

    /// Create a track point with altitude in meters
    pub fn with_altitude(latitude: f64, longitude: f64, altitude: f64, timestamp: i64) -> Self {
        Self {
            position: GpsPoint::new(latitude, longitude),
            altitude: Some(altitude),
            timestamp,
        }
    }
}

// ============================================================================
// Interest Points
// ============================================================================

/// A user annotation anchored to a position.
///
/// The position is supplied by the caller (typically the last known device
/// location) and is independent of the trajectory. Construction validates
/// the fields; the point is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestPoint {
    position: GpsPoint,
    title: String,
    description: Option<String>,
}

impl InterestPoint {
    /// Create a validated interest point.
    ///
    /// Fails when the title is empty (or whitespace only) or the position
    /// is out of range.
    pub fn new(
        position: GpsPoint,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(RecorderError::Validation {
                field: "title",
                message: "interest point title must not be empty".to_string(),
            });
        }
        if !position.is_valid() {
            return Err(RecorderError::Validation {
                field: "position",
                message: format!(
                    "invalid coordinates ({}, {})",
                    position.latitude, position.longitude
                ),
            });
        }
        Ok(Self {
            position,
            title,
            description,
        })
    }

    /// Anchored position
    pub fn position(&self) -> GpsPoint {
        self.position
    }

    /// Short label shown on the map
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional free-text description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

// ============================================================================
// Route
// ============================================================================

/// The aggregate record of one recording session.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    id: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    track_points: Vec<TrackPoint>,
    interest_points: Vec<InterestPoint>,
}

impl Route {
    /// Create an empty route with a generated identifier
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::with_id(generate_route_id(), name, description, created_at)
    }

    /// Create an empty route with a caller-provided identifier.
    ///
    /// Used by import and sync paths where identity already exists
    /// externally. Identity fields are not validated here; export checks
    /// them (see [`Route::to_transfer_representation`]).
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            created_at,
            track_points: Vec::new(),
            interest_points: Vec::new(),
        }
    }

    /// Create a route with default metadata: a generated identifier and a
    /// name derived from the creation instant.
    pub fn untitled() -> Self {
        let now = Utc::now();
        let name = format!("Route {}", now.format("%Y-%m-%d %H:%M"));
        Self::new(name, "", now)
    }

    /// Stable route identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description (may be empty)
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Creation instant
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Trajectory samples in insertion order
    pub fn track_points(&self) -> &[TrackPoint] {
        &self.track_points
    }

    /// Interest points in insertion order
    pub fn interest_points(&self) -> &[InterestPoint] {
        &self.interest_points
    }

    /// Append a sample to the trajectory.
    ///
    /// Insertion order is temporal order; consecutive duplicates are kept
    /// as delivered.
    pub fn append_track_point(&mut self, point: TrackPoint) {
        self.track_points.push(point);
    }

    /// Append a user annotation
    pub fn append_interest_point(&mut self, point: InterestPoint) {
        self.interest_points.push(point);
    }

    /// Total trajectory length in meters
    pub fn total_distance(&self) -> f64 {
        geo_utils::trajectory_distance(&self.track_points)
    }

    /// Build the transfer representation handed to the sync collaborator.
    ///
    /// Fails when identity fields required by the backend (id, name) are
    /// unset or whitespace only.
    pub fn to_transfer_representation(&self) -> Result<RouteTransfer> {
        if self.id.trim().is_empty() {
            return Err(RecorderError::Serialization {
                message: "route identifier is unset".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(RecorderError::Serialization {
                message: "route name is unset".to_string(),
            });
        }
        Ok(RouteTransfer {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            date: self.created_at.to_rfc3339(),
            trajectory: self.track_points.iter().map(TransferTrackPoint::from).collect(),
            interest_points: self
                .interest_points
                .iter()
                .map(TransferInterestPoint::from)
                .collect(),
        })
    }
}

/// Generate a route identifier from the current clock
fn generate_route_id() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: u32 = (ts % 100_000) as u32;
    format!("route_{}_{:05}", ts, suffix)
}
