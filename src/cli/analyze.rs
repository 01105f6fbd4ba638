// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::cli::args::AnalyzeArgs;
use crate::cli::logging::{Paint, set_verbose};
use crate::error::Result;
use crate::posture::assess;
use crate::source::{FrameMeta, FrameReader, FrameRecord};
use crate::{GaitAccumulator, GaitConfig, GaitReport, VERSION};
use crate::{section, status, success, verbose, warn};

/// Run gait analysis over a per-frame landmark stream and print the summary.
///
/// With `--json`, stdout carries only the JSON document.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the source cannot be read,
/// or a frame record is malformed.
pub fn run_analysis(args: &AnalyzeArgs) -> Result<GaitReport> {
    set_verbose(args.verbose_output());
    let config = args.resolve_config()?;

    section!("dog-gait {VERSION} 🐕");
    verbose!(
        "Config: layout={}, fps={}, knee_threshold={}, injury_fraction={}, min_detected={}s, dog_threshold={}",
        config.layout,
        config.fps,
        config.knee_threshold,
        config.injury_fraction,
        config.min_detected_secs,
        config.dog_threshold
    );
    verbose!("");

    let frames = FrameReader::open(&args.source, config.fps)?;
    let report = analyze_frames(frames, &args.source, &config)?;

    if report.frames == 0 {
        warn!("No frames read from '{}'", args.source);
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        section!("Gait summary");
        println!("{report}");
        verbose!("Verdict: {}", report.verdict.paint());
    }

    if let Some(path) = &args.save {
        report.save(path)?;
        if !args.json {
            success!("Summary saved to {}", path.display());
        }
    }

    Ok(report)
}

/// Fold every frame of a reader into a gait report.
///
/// # Errors
///
/// Returns the first read, parse, timestamp, or landmark error.
pub fn analyze_frames<I>(frames: I, source: &str, config: &GaitConfig) -> Result<GaitReport>
where
    I: IntoIterator<Item = Result<(FrameRecord, FrameMeta)>>,
{
    let mut accumulator = GaitAccumulator::new();
    let mut total = 0;
    let mut detected = 0;
    let mut short_poses = 0;

    for item in frames {
        let (record, meta) = item?;
        let pose = record.pose()?;
        if let Some(pose) = &pose
            && !pose.fits(config.layout)
        {
            if short_poses == 0 {
                warn!(
                    "frame {}: pose has {} landmarks but layout '{}' expects {}, check --layout",
                    meta.frame_idx,
                    pose.len(),
                    config.layout,
                    config.layout.num_keypoints()
                );
            }
            short_poses += 1;
        }

        let assessment = assess(pose.as_ref(), record.dog_score, config);
        total += 1;
        if assessment.label().is_some() {
            detected += 1;
        }
        status!(&meta, &assessment);

        accumulator.observe(assessment.sample(meta.timestamp));
    }

    if short_poses > 1 {
        warn!("{short_poses} poses had fewer landmarks than layout '{}' expects", config.layout);
    }

    let totals = accumulator.finish();
    Ok(GaitReport::new(source, total, detected, &totals, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Verdict;
    use std::fmt::Write;
    use std::io::Cursor;

    /// One JSON line for a horizontal `MediaPipe` dog with the given knee heights.
    fn dog_line(frame: usize, left_knee_y: f32, right_knee_y: f32) -> String {
        let mut rows = vec![[0.0_f32, 0.0]; 33];
        rows[11] = [0.30, 0.40];
        rows[12] = [0.32, 0.41];
        rows[23] = [0.70, 0.42];
        rows[24] = [0.72, 0.43];
        rows[25] = [0.35, left_knee_y];
        rows[26] = [0.68, right_knee_y];
        let landmarks: Vec<String> = rows.iter().map(|[x, y]| format!("[{x}, {y}]")).collect();
        format!("{{\"frame\": {frame}, \"landmarks\": [{}]}}", landmarks.join(", "))
    }

    fn run(input: &str, config: &GaitConfig) -> GaitReport {
        set_verbose(false);
        let reader = FrameReader::new(Cursor::new(input.as_bytes().to_vec()), config.fps).unwrap();
        analyze_frames(reader, "test", config).unwrap()
    }

    #[test]
    fn test_mostly_healthy_walk() {
        // 10 fps, 8 s total: frames 0..=69 healthy, 70..=79 injured
        let mut input = String::new();
        for frame in 0..80 {
            let line = if frame < 70 {
                dog_line(frame, 0.70, 0.72)
            } else {
                dog_line(frame, 0.60, 0.80)
            };
            writeln!(input, "{line}").unwrap();
        }
        let config = GaitConfig::new().with_fps(10.0);
        let report = run(&input, &config);

        assert_eq!(report.frames, 80);
        assert_eq!(report.detected_frames, 80);
        assert!((report.healthy_secs - 7.0).abs() < 1e-9);
        assert!((report.injured_secs - 0.9).abs() < 1e-9);
        assert!((report.detected_secs - 7.9).abs() < 1e-9);
        assert_eq!(report.verdict, Verdict::Healthy);
    }

    #[test]
    fn test_limping_walk() {
        let mut input = String::new();
        for frame in 0..100 {
            let line = if frame % 2 == 0 {
                dog_line(frame, 0.60, 0.80)
            } else {
                dog_line(frame, 0.70, 0.72)
            };
            writeln!(input, "{line}").unwrap();
        }
        let report = run(&input, &GaitConfig::new().with_fps(10.0));
        // Alternating labels: each interval lasts one frame, half of them injured
        assert!((report.detected_secs - 9.9).abs() < 1e-9);
        assert_eq!(report.verdict, Verdict::Injured);
    }

    #[test]
    fn test_gaps_and_rejected_frames() {
        let mut input = String::new();
        writeln!(input, "{}", dog_line(0, 0.70, 0.72)).unwrap();
        writeln!(input, "{}", dog_line(10, 0.70, 0.72)).unwrap();
        writeln!(input, "{{\"frame\": 20}}").unwrap();
        writeln!(input, "{{\"frame\": 30, \"dog_score\": 0.2}}").unwrap();

        let report = run(&input, &GaitConfig::new().with_fps(10.0));
        assert_eq!(report.frames, 4);
        assert_eq!(report.detected_frames, 2);
        assert!((report.healthy_secs - 2.0).abs() < 1e-9);
        assert!((report.detected_secs - 2.0).abs() < 1e-9);
        assert_eq!(report.verdict, Verdict::Inconclusive);
    }

    #[test]
    fn test_empty_stream() {
        let report = run("", &GaitConfig::default());
        assert_eq!(report.frames, 0);
        assert_eq!(report.verdict, Verdict::Inconclusive);
    }

    #[test]
    fn test_short_pose_counts_as_missing() {
        // A 17-point COCO pose read with the MediaPipe layout lacks hips and knees
        let mut input = String::new();
        for frame in 0..10 {
            writeln!(input, "{}", dog_line(frame, 0.70, 0.72)).unwrap();
        }
        let coco_rows = vec!["[0.5, 0.5]"; 17].join(", ");
        writeln!(input, "{{\"frame\": 10, \"landmarks\": [{coco_rows}]}}").unwrap();

        let report = run(&input, &GaitConfig::new().with_fps(10.0));
        assert_eq!(report.frames, 11);
        assert_eq!(report.detected_frames, 10);
        assert!((report.healthy_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_landmarks_fail() {
        set_verbose(false);
        let input = "{\"landmarks\": [[0.1, 0.2], [0.3]]}\n";
        let reader = FrameReader::new(Cursor::new(input.as_bytes().to_vec()), 30.0).unwrap();
        assert!(analyze_frames(reader, "test", &GaitConfig::default()).is_err());
    }
}
