//! Demonstration of a complete recording session: initialize, record for a
//! second, pause, resume, stop, and print the collected gaze table.
//!
//! Run with:
//!
//! ```text
//! cargo run --example record_session
//! ```

use std::time::{Duration, Instant};

use anyhow::Context;
use gazelink::{DisplayGeometry, Gazelink};

fn record_for(
    session: &mut gazelink::TrackerSession<gazelink::SyntheticDevice>,
    duration: Duration,
) -> anyhow::Result<()> {
    let tick = Duration::from_secs_f64(1.0 / session.sample_rate_hz());
    let deadline = Instant::now() + duration;
    while Instant::now() < deadline {
        session.update().context("error during recording")?;
        std::thread::sleep(tick);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazelink=info".into()),
        )
        .init();

    println!("Initializing tracker...");
    let geometry = DisplayGeometry::new(2560.0, 1440.0, 0.0);
    let mut session = Gazelink::simulate(geometry, "mh@int.lab")
        .context("failed to initialize tracker")?;

    if !session.is_license_valid() {
        anyhow::bail!("license is invalid or expired");
    }

    println!("Recording for 1 second...");
    session.start().context("failed to start recording")?;
    record_for(&mut session, Duration::from_secs(1))?;

    println!("Pausing recording for 1 second...");
    session.pause();
    std::thread::sleep(Duration::from_secs(1));

    println!("Resuming recording for 1 more second...");
    session.start().context("failed to resume recording")?;
    record_for(&mut session, Duration::from_secs(1))?;

    println!("Stopping recording and fetching results...");
    session.stop();

    let table = session.formatted_data().context("failed to fetch gaze data")?;
    println!("Collected {} gaze points:", table.len());
    println!("{table}");

    println!("Recording session complete.");
    Ok(())
}
