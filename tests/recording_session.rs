//! Integration tests for the recording session lifecycle.
//!
//! These tests verify session control, scripted playback, and background
//! recording end to end, with no hardware attached.

use std::io::Write;

use futures::StreamExt;
use gazelink::{
    DisplayGeometry, Gazelink, LicenseKey, Recorder, SessionState, SyntheticConfig,
    SyntheticDevice, TrackerError, TrackerSession, UpdateRate,
};

fn geometry() -> DisplayGeometry {
    DisplayGeometry::new(2560.0, 1440.0, 0.0)
}

fn synthetic_session(device_id: &str) -> TrackerSession<SyntheticDevice> {
    let key = LicenseKey::from("valid-key");
    let mut config = SyntheticConfig::accepting("valid-key");
    config.device_id = device_id.to_string();
    Gazelink::simulate_with(geometry(), &key, config).expect("synthetic session should open")
}

#[test]
fn full_lifecycle_collects_twenty_points_in_timestamp_order() {
    let mut session = synthetic_session("it-canonical");
    assert!(session.is_license_valid());

    session.start().unwrap();
    for _ in 0..10 {
        assert!(session.update().unwrap());
    }

    session.pause();
    assert_eq!(session.state(), SessionState::Paused);

    session.start().unwrap();
    for _ in 0..10 {
        assert!(session.update().unwrap());
    }

    session.stop();
    assert_eq!(session.state(), SessionState::Stopped);

    let table = session.formatted_data().unwrap();
    assert_eq!(table.len(), 20);

    let rows = table.rows();
    assert!(rows.windows(2).all(|w| w[1].timestamp_us > w[0].timestamp_us));
    let sequences: Vec<u64> = rows.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, (0..20).collect::<Vec<u64>>());
}

#[test]
fn buffer_is_non_decreasing_across_pause_resume_cycles() {
    let mut session = synthetic_session("it-nondecreasing");
    session.start().unwrap();

    let mut last_count = 0;
    for _ in 0..4 {
        for _ in 0..5 {
            session.update().unwrap();
        }
        let count = session.sample_count();
        assert!(count >= last_count);
        last_count = count;
        session.pause();
        assert_eq!(session.sample_count(), last_count);
        session.start().unwrap();
    }
    assert_eq!(last_count, 20);
}

#[test]
fn scripted_playback_drives_a_full_session() {
    let scenario_yaml = r#"
name: it-sweep
sample_rate_hz: 120.0
license:
  accepted: int.lab2024
  expires: 2099/12/31
ticks:
  - kind: point
    x: 0.1
    y: 0.5
  - kind: empty
  - kind: point
    x: 0.5
    y: 0.5
  - kind: fault
    reason: subject out of range
  - kind: point
    x: 0.9
    y: 0.5
    valid: false
"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(scenario_yaml.as_bytes()).unwrap();

    let key = LicenseKey::from("int.lab2024");
    let mut session = Gazelink::open_scenario(file.path(), geometry(), &key).unwrap();
    assert!(session.is_license_valid());

    session.start().unwrap();

    let mut appended = 0;
    let mut faults = 0;
    for _ in 0..5 {
        match session.update() {
            Ok(true) => appended += 1,
            Ok(false) => {}
            Err(e) => {
                assert!(e.is_retryable());
                faults += 1;
            }
        }
    }

    assert_eq!(appended, 3);
    assert_eq!(faults, 1);

    session.stop();
    let table = session.formatted_data().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows()[0].x, 256.0);
    assert_eq!(table.rows()[2].validity, "Invalid");
    // 120Hz script: scripted ticks land ~8.3ms apart
    assert!(table.rows().windows(2).all(|w| w[1].timestamp_us > w[0].timestamp_us));
}

#[test]
fn rejected_credential_blocks_recording_but_not_queries() {
    let key = LicenseKey::from("not-the-right-key");
    let mut config = SyntheticConfig::accepting("valid-key");
    config.device_id = "it-rejected".to_string();
    let mut session = Gazelink::simulate_with(geometry(), &key, config).unwrap();

    assert!(!session.is_license_valid());
    assert_eq!(session.state(), SessionState::Created);

    let err = session.start().unwrap_err();
    assert!(matches!(err, TrackerError::Recording { operation: "start", .. }));
}

#[test]
fn one_device_identity_one_session() {
    let key = LicenseKey::from("valid-key");
    let mut config = SyntheticConfig::accepting("valid-key");
    config.device_id = "it-exclusive".to_string();

    let first = SyntheticDevice::open(geometry(), &key, config.clone()).unwrap();
    let conflict = SyntheticDevice::open(geometry(), &key, config.clone());
    assert!(matches!(conflict.unwrap_err(), TrackerError::Initialization { .. }));

    // Stopping the session releases the claim for a new construction
    let mut session = TrackerSession::new(first, geometry()).unwrap();
    session.start().unwrap();
    session.update().unwrap();
    session.stop();

    let reopened = SyntheticDevice::open(geometry(), &key, config);
    assert!(reopened.is_ok());
}

#[tokio::test(start_paused = true)]
async fn background_recorder_round_trip() {
    let key = LicenseKey::from("valid-key");
    let mut config = SyntheticConfig::accepting("valid-key");
    config.device_id = "it-recorder".to_string();
    config.sample_rate_hz = 250.0;
    let device = SyntheticDevice::open(geometry(), &key, config).unwrap();

    let mut recorder = Gazelink::record(device).unwrap();
    let mut preview = recorder.subscribe(UpdateRate::Native);

    recorder.start().unwrap();

    // Live subscription sees samples while recording
    let first = preview.next().await.expect("preview should deliver");
    let second = preview.next().await.expect("preview should keep delivering");
    assert!(second.timestamp_us > first.timestamp_us);

    recorder.pause();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let frozen = recorder.sample_count();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert_eq!(recorder.sample_count(), frozen);

    recorder.resume().unwrap();
    while recorder.sample_count() < frozen + 5 {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let table = recorder.stop().await;
    assert!(table.len() >= frozen + 5);
    assert!(table.rows().windows(2).all(|w| w[1].sequence == w[0].sequence + 1));
    assert!(table.rows().windows(2).all(|w| w[1].timestamp_us > w[0].timestamp_us));
}

#[tokio::test(start_paused = true)]
async fn recorder_refuses_invalid_credential() {
    let key = LicenseKey::from("wrong");
    let mut config = SyntheticConfig::accepting("valid-key");
    config.device_id = "it-recorder-unlicensed".to_string();
    let device = SyntheticDevice::open(geometry(), &key, config).unwrap();

    let mut recorder: Recorder = Gazelink::record(device).unwrap();
    assert!(!recorder.is_license_valid());
    assert!(recorder.start().is_err());

    let table = recorder.stop().await;
    assert!(table.is_empty());
}
