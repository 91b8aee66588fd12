//! Recording lifecycle integration scenarios
//!
//! Drives the recorder the way a mobile embedding does: begin a session,
//! feed the location callback stream, pause and resume around it, annotate,
//! stop, and hand the transfer representation to the sync side.
//!
//! Run with: cargo test --test lifecycle

use chrono::Utc;
use route_recorder::{
    begin_recording, clear_session, take_finished_route, with_recorder, GpsPoint, InterestPoint,
    RecorderError, RecorderState, Route, RouteRecorder, TrackPoint,
};

fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_route() -> Route {
    Route::new("Morning loop", "around the park", Utc::now())
}

fn running_recorder() -> RouteRecorder {
    let mut recorder = RouteRecorder::new(sample_route());
    recorder.start().expect("start from created");
    recorder
}

// ============================================================================
// Full session
// ============================================================================

#[test]
fn full_session_produces_ordered_transfer() {
    init_test_logging();
    let mut recorder = running_recorder();

    assert!(recorder.add_location(TrackPoint::with_altitude(
        48.8566,
        2.3522,
        35.0,
        1_718_004_662_000
    )));
    assert!(recorder.add_location(TrackPoint::new(48.8576, 2.3522, 1_718_004_665_000)));

    recorder.pause().unwrap();
    // The provider keeps emitting while paused; nothing is appended
    assert!(!recorder.add_location(TrackPoint::new(48.8999, 2.3999, 1_718_004_668_000)));
    recorder
        .add_interest_point(
            InterestPoint::new(GpsPoint::new(48.8576, 2.3522), "Fountain", None).unwrap(),
        )
        .unwrap();
    recorder.resume().unwrap();

    assert!(recorder.add_location(TrackPoint::new(48.8586, 2.3522, 1_718_004_671_000)));
    recorder.stop().unwrap();

    // Two segments of ~111 m each
    let distance = recorder.route().total_distance();
    assert!(distance > 220.0 && distance < 225.0, "got {}", distance);

    let transfer = recorder.route().to_transfer_representation().unwrap();
    let json = transfer.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], "Morning loop");
    assert_eq!(value["description"], "around the park");
    assert!(value["date"].as_str().unwrap().starts_with("20"));

    let trajectory = value["trajectory"].as_array().unwrap();
    assert_eq!(trajectory.len(), 3);
    assert_eq!(trajectory[0]["timestamp"], 1_718_004_662_000i64);
    assert_eq!(trajectory[0]["altitude"], 35.0);
    assert!(trajectory[1].get("altitude").is_none());
    assert_eq!(trajectory[2]["timestamp"], 1_718_004_671_000i64);

    let interest_points = value["interestPoints"].as_array().unwrap();
    assert_eq!(interest_points.len(), 1);
    assert_eq!(interest_points[0]["title"], "Fountain");
    assert!(interest_points[0].get("description").is_none());
}

#[test]
fn pause_window_is_cut_from_trajectory() {
    // start; t1; t2; pause; t3 discarded; resume; t4; stop => [t1, t2, t4]
    let mut recorder = running_recorder();
    assert!(recorder.add_location(TrackPoint::new(48.0, 2.0, 1_000)));
    assert!(recorder.add_location(TrackPoint::new(48.1, 2.1, 2_000)));
    recorder.pause().unwrap();
    assert!(!recorder.add_location(TrackPoint::new(48.2, 2.2, 3_000)));
    recorder.resume().unwrap();
    assert!(recorder.add_location(TrackPoint::new(48.3, 2.3, 4_000)));
    recorder.stop().unwrap();

    let stamps: Vec<i64> = recorder
        .route()
        .track_points()
        .iter()
        .map(|p| p.timestamp)
        .collect();
    assert_eq!(stamps, vec![1_000, 2_000, 4_000]);
}

// ============================================================================
// Misuse
// ============================================================================

#[test]
fn lifecycle_misuse_is_loud() {
    init_test_logging();
    let mut recorder = RouteRecorder::new(sample_route());

    assert!(matches!(
        recorder.stop(),
        Err(RecorderError::InvalidTransition {
            from: RecorderState::Created,
            ..
        })
    ));
    assert!(recorder.resume().is_err());

    recorder.start().unwrap();
    assert!(matches!(
        recorder.start(),
        Err(RecorderError::InvalidTransition {
            from: RecorderState::Running,
            ..
        })
    ));
    assert!(recorder.is_running());

    recorder.stop().unwrap();
    assert!(recorder.pause().is_err());
    assert!(recorder.resume().is_err());
    assert!(recorder.start().is_err());
}

#[test]
fn stopped_route_stays_frozen() {
    let mut recorder = running_recorder();
    recorder.add_location(TrackPoint::new(48.0, 2.0, 1_000));
    recorder
        .add_interest_point(
            InterestPoint::new(GpsPoint::new(48.0, 2.0), "Bench", Some("shady".to_string()))
                .unwrap(),
        )
        .unwrap();
    recorder.stop().unwrap();

    let snapshot = recorder.route().clone();
    assert!(!recorder.add_location(TrackPoint::new(48.1, 2.1, 2_000)));
    assert!(recorder
        .add_interest_point(InterestPoint::new(GpsPoint::new(48.1, 2.1), "Gate", None).unwrap())
        .is_err());
    assert_eq!(recorder.route(), &snapshot);
}

// ============================================================================
// Ownership transfer
// ============================================================================

#[test]
fn route_ownership_moves_out_after_stop() {
    let mut recorder = running_recorder();
    recorder.add_location(TrackPoint::new(48.0, 2.0, 1_000));
    recorder.stop().unwrap();

    let route = recorder.into_route().unwrap();
    assert_eq!(route.track_points().len(), 1);
    assert_eq!(route.name(), "Morning loop");

    // A live recorder refuses to give its route up
    let live = running_recorder();
    assert!(matches!(
        live.into_route(),
        Err(RecorderError::InvalidTransition {
            from: RecorderState::Running,
            ..
        })
    ));
}

#[test]
fn export_requires_identity_fields() {
    let mut recorder = RouteRecorder::new(Route::with_id("", "", "", Utc::now()));
    recorder.start().unwrap();
    recorder.add_location(TrackPoint::new(48.0, 2.0, 1_000));
    recorder.stop().unwrap();

    assert!(matches!(
        recorder.route().to_transfer_representation(),
        Err(RecorderError::Serialization { .. })
    ));
}

// ============================================================================
// Process-wide session
// ============================================================================

// Only this test may touch the session slot in this binary; the other
// scenarios use local recorders so parallel test threads stay independent.
#[test]
fn session_slot_drives_full_flow() {
    init_test_logging();
    clear_session();

    let id = begin_recording(sample_route());
    with_recorder(|r| r.start()).unwrap();
    with_recorder(|r| Ok(r.add_location(TrackPoint::new(48.8566, 2.3522, 1_000)))).unwrap();
    with_recorder(|r| Ok(r.add_location(TrackPoint::new(48.8576, 2.3522, 2_000)))).unwrap();

    assert!(matches!(
        take_finished_route(),
        Err(RecorderError::InvalidTransition { .. })
    ));

    with_recorder(|r| r.stop()).unwrap();
    let route = take_finished_route().unwrap();
    assert_eq!(route.id(), id);
    assert_eq!(route.track_points().len(), 2);

    // The slot is empty; a fresh session starts clean
    assert!(matches!(
        with_recorder(|r| r.start()),
        Err(RecorderError::NoActiveSession)
    ));
    begin_recording(sample_route());
    with_recorder(|r| r.start()).unwrap();
    assert_eq!(
        with_recorder(|r| Ok(r.route().track_points().len())).unwrap(),
        0
    );
    assert!(clear_session());
}
