//! Transfer representation of a finalized route
//!
//! The structured form handed to the sync collaborator after `stop()`. The
//! collaborator POSTs it to the backend and persists it on transport
//! failure; this module only guarantees the representation is complete and
//! order-preserving. Field names follow the backend contract (camelCase,
//! ISO-8601 date).

use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};
use crate::route::{InterestPoint, TrackPoint};

/// Serialized route handed to the sync collaborator.
///
/// ```json
/// {
///   "id": "route_1718000000000_04217",
///   "name": "Morning loop",
///   "description": "",
///   "date": "2024-06-10T07:31:02+00:00",
///   "trajectory": [
///     { "latitude": 48.8566, "longitude": 2.3522, "altitude": 35.0, "timestamp": 1718004662000 }
///   ],
///   "interestPoints": [
///     { "latitude": 48.8566, "longitude": 2.3522, "title": "Fountain" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTransfer {
    /// Stable route identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description (may be empty)
    pub description: String,
    /// Creation date in ISO-8601 / RFC 3339
    pub date: String,
    /// Trajectory in recording order
    pub trajectory: Vec<TransferTrackPoint>,
    /// User annotations in insertion order
    pub interest_points: Vec<TransferInterestPoint>,
}

/// One trajectory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in meters; omitted when the provider reported none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Capture time as Unix epoch milliseconds
    pub timestamp: i64,
}

/// One interest-point entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInterestPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RouteTransfer {
    /// Encode as a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RecorderError::Serialization {
            message: e.to_string(),
        })
    }
}

impl From<&TrackPoint> for TransferTrackPoint {
    fn from(point: &TrackPoint) -> Self {
        Self {
            latitude: point.position.latitude,
            longitude: point.position.longitude,
            altitude: point.altitude,
            timestamp: point.timestamp,
        }
    }
}

impl From<&InterestPoint> for TransferInterestPoint {
    fn from(point: &InterestPoint) -> Self {
        Self {
            latitude: point.position().latitude,
            longitude: point.position().longitude,
            title: point.title().to_string(),
            description: point.description().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transfer() -> RouteTransfer {
        RouteTransfer {
            id: "route_1718000000000_04217".to_string(),
            name: "Morning loop".to_string(),
            description: String::new(),
            date: "2024-06-10T07:31:02+00:00".to_string(),
            trajectory: vec![
                TransferTrackPoint {
                    latitude: 48.8566,
                    longitude: 2.3522,
                    altitude: Some(35.0),
                    timestamp: 1_718_004_662_000,
                },
                TransferTrackPoint {
                    latitude: 48.8576,
                    longitude: 2.3532,
                    altitude: None,
                    timestamp: 1_718_004_665_000,
                },
            ],
            interest_points: vec![TransferInterestPoint {
                latitude: 48.8566,
                longitude: 2.3522,
                title: "Fountain".to_string(),
                description: None,
            }],
        }
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = sample_transfer().to_json().unwrap();
        assert!(json.contains("\"interestPoints\""));
        assert!(json.contains("\"date\":\"2024-06-10T07:31:02+00:00\""));
        assert!(!json.contains("interest_points"));
    }

    #[test]
    fn test_json_omits_missing_optionals() {
        let json = sample_transfer().to_json().unwrap();
        // First point has altitude, second does not; the key must not
        // appear with a null for the second one.
        assert_eq!(json.matches("\"altitude\"").count(), 1);
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_round_trip() {
        let transfer = sample_transfer();
        let json = transfer.to_json().unwrap();
        let back: RouteTransfer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transfer);
    }

    #[test]
    fn test_trajectory_order_survives_encoding() {
        let json = sample_transfer().to_json().unwrap();
        let back: RouteTransfer = serde_json::from_str(&json).unwrap();
        let stamps: Vec<i64> = back.trajectory.iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![1_718_004_662_000, 1_718_004_665_000]);
    }
}
