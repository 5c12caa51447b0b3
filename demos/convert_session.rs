//! End-to-end walkthrough: convert one synthetic plasticity session
//!
//! Mirrors a real recording day: a baseline epoch, a break while the
//! induction protocol is set up, the plasticity induction itself,
//! another break, and a closing baseline epoch.
//!
//! Run with: `cargo run --example convert_session`

use anyhow::Result;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use icephys_convert::hierarchy::{ConditionLayout, ConditionSpec};
use icephys_convert::session::{DeviceRecord, ElectrodeRecord, SessionRecord, SubjectRecord};
use icephys_convert::sweeps::SweepSet;
use icephys_convert::{Converter, SessionMetadata};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Patch-Clamp Session Conversion Demo ===\n");

    // Stage 1: raw per-sweep arrays, as loaded from the acquisition
    // export. Five runs of four sweeps each.
    println!("1. Assembling raw sweep arrays...");
    let sweeps = synthetic_session(4, 2_000);
    println!(
        "   {} sweeps, {} points each, {:.0} Hz",
        sweeps.len(),
        sweeps.point_counts[0],
        sweeps.sampling_rate()
    );

    // Stage 2: the experimental design. Repetitions 0 and 4 are the
    // stimulated baselines, 1 and 3 the breaks, 2 the induction.
    println!("\n2. Declaring the condition layout...");
    let layout = ConditionLayout::new(vec![
        ConditionSpec::new("baselineStim", vec![0, 4]),
        ConditionSpec::new("noStim", vec![1, 3]),
        ConditionSpec::new("plasticityInduction", vec![2]),
    ]);

    // Stage 3: session-level metadata records.
    println!("\n3. Building metadata records...");
    let start = Utc.with_ymd_and_hms(2018, 1, 26, 14, 0, 0).unwrap();
    let session = SessionRecord::builder(
        "180126__s1c1",
        "Current and voltage clamp recordings using a plasticity-inducing protocol.",
        start,
    )
    .experimenter("MU")
    .institution("University of Bristol")
    .lab("Jack Mellor lab")
    .build();
    let device = DeviceRecord::new(
        "Amplifier_Multiclamp_700A",
        "Amplifier for recording intracellular data.",
        "Molecular Devices",
    );
    let electrode = ElectrodeRecord::new(
        "icephys_electrode",
        "A patch clamp electrode",
        "Cell soma in CA1 of hippocampus",
        "slice #1",
        device.name(),
    );
    let metadata = SessionMetadata {
        session,
        subject: Some(
            SubjectRecord::builder("180126", "Mus musculus", "F")
                .age(SubjectRecord::age_from_days(34))
                .strain("Ai32/PVcre")
                .build(),
        ),
        device: Some(device),
        electrode: Some(electrode),
    };

    // Stage 4: the conversion itself.
    println!("\n4. Converting...");
    let store = Converter::builder()
        .condition_layout(layout)
        .build()
        .convert(&sweeps, metadata)?;

    // Stage 5: inspect the result.
    println!("\n5. Converted session:");
    println!("   series pairs:   {}", store.series_count());
    println!("   recording rows: {}", store.recording_count());
    let hierarchy = store.hierarchy().expect("hierarchy attached");
    println!("   simultaneous:   {}", hierarchy.simultaneous.len());
    println!("   sequential:     {}", hierarchy.sequential.len());
    println!("   repetitions:    {}", hierarchy.repetitions.len());
    println!("   conditions:     {}", hierarchy.conditions.len());
    for condition in &hierarchy.conditions {
        println!(
            "     {:<20} repetitions {:?}",
            condition.tag(),
            condition.repetition_rows()
        );
    }
    let first = &store.series()[0].response;
    println!(
        "   first response: {} ({} {:?}, rate {:.0} Hz)",
        first.name(),
        first.data().len(),
        first.unit(),
        first.rate()
    );

    // Stage 6: JSON snapshot, the hand-off format for the downstream
    // data-model library.
    println!("\n6. Snapshot:");
    let json = store.snapshot_json()?;
    println!("   {} bytes of JSON", json.len());

    println!("\n=== Demo Complete ===");
    Ok(())
}

/// Baseline / break / plasticity / break / baseline session with
/// `per_run` sweeps per run.
fn synthetic_session(per_run: usize, points: usize) -> SweepSet {
    let mut rng = StdRng::seed_from_u64(180_126);
    let blocks: [(&str, i64); 5] = [("1", 0), ("b", 9), ("0", 2), ("b", 9), ("1", 1)];
    let n = per_run * blocks.len();

    let mut labels = Vec::with_capacity(n);
    let mut states = Vec::with_capacity(n);
    for (prefix, state) in blocks {
        for i in 0..per_run {
            labels.push(format!("{prefix}{i:03}"));
            states.push(state);
        }
    }

    SweepSet {
        ids: (1..=n as i64).collect(),
        labels,
        point_counts: vec![points; n],
        start_times: (0..n).map(|i| i as f64 * 5.0).collect(),
        state_codes: states,
        samples: (0..n)
            .map(|_| (0..points).map(|_| rng.gen_range(-1e-9..1e-9)).collect())
            .collect(),
        sampling_interval: 5e-5,
    }
}
