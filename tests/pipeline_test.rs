//! Pipeline integration tests
//!
//! Drives `LadderPipeline` with in-memory inspector and encoder fakes, so no
//! ffmpeg or ffprobe is needed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tempfile::tempdir;
use tohls::LadderPipeline;
use tohls_ladder::{
    FormatDescriptor, RenditionEncoder, ResolvedRendition, SourceInspector, SourceMetadata,
};

// ===== Fakes =====

/// Answers every probe with a canned ffprobe CSV line.
struct CsvInspector {
    output: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SourceInspector for CsvInspector {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn inspect(&self, path: &Path) -> tohls_core::Result<SourceMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if path.to_string_lossy().contains("broken") {
            return Err(tohls_core::Error::probe("no video stream"));
        }
        SourceMetadata::parse_probe_output(self.output)
    }
}

/// Records encode requests; optionally fails on one height and delays
/// smaller renditions so they finish last.
#[derive(Default)]
struct RecordingEncoder {
    encoded: Arc<Mutex<Vec<(u32, u32)>>>,
    fail_height: Option<u32>,
    stagger: bool,
}

#[async_trait]
impl RenditionEncoder for RecordingEncoder {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn encode(
        &self,
        _source: &Path,
        rendition: &ResolvedRendition,
    ) -> tohls_core::Result<String> {
        if self.stagger {
            let ms = 60_000 / u64::from(rendition.height);
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if self.fail_height == Some(rendition.height) {
            return Err(tohls_core::Error::tool("recording", "encoder crashed"));
        }
        self.encoded
            .lock()
            .unwrap()
            .push((rendition.width, rendition.height));
        Ok(rendition.playlist_name())
    }
}

fn formats(specs: &[&str]) -> Vec<FormatDescriptor> {
    specs.iter().map(|s| s.parse().unwrap()).collect()
}

fn inspector(output: &'static str) -> (CsvInspector, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (
        CsvInspector {
            output,
            calls: calls.clone(),
        },
        calls,
    )
}

// ===== Tests =====

#[tokio::test]
async fn writes_master_playlist_in_format_order() {
    let dir = tempdir().unwrap();
    let (insp, probes) = inspector("3840,2160,30/1");
    let encoder = RecordingEncoder::default();
    let encoded = encoder.encoded.clone();

    let pipeline =
        LadderPipeline::new(Box::new(insp), Box::new(encoder)).with_output_dir(dir.path());
    let master = pipeline
        .process_file(
            &formats(&["360p::", "1920x1080:30:0.1", "720p::"]),
            Path::new("/media/drone.mp4"),
        )
        .await
        .unwrap();

    assert_eq!(master, dir.path().join("drone.mp4.master.m3u8"));
    assert_eq!(probes.load(Ordering::SeqCst), 1);
    assert_eq!(
        *encoded.lock().unwrap(),
        vec![(640, 360), (1920, 1080), (1280, 720)]
    );

    let text = std::fs::read_to_string(&master).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "#EXTM3U");
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[1], "#EXT-X-STREAM-INF:BANDWIDTH=760320,RESOLUTION=640x360");
    assert_eq!(lines[2], "v640x360.m3u8");
    assert_eq!(lines[3], "#EXT-X-STREAM-INF:BANDWIDTH=6220800,RESOLUTION=1920x1080");
    assert_eq!(lines[4], "v1920x1080.m3u8");
    assert_eq!(lines[5], "#EXT-X-STREAM-INF:BANDWIDTH=3041280,RESOLUTION=1280x720");
    assert_eq!(lines[6], "v1280x720.m3u8");
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn zero_denominator_fails_before_encoding() {
    let dir = tempdir().unwrap();
    let (insp, _) = inspector("1920,1080,30/0");
    let encoder = RecordingEncoder::default();
    let encoded = encoder.encoded.clone();

    let pipeline =
        LadderPipeline::new(Box::new(insp), Box::new(encoder)).with_output_dir(dir.path());
    let err = pipeline
        .process_file(&formats(&["720p::"]), Path::new("clip.mp4"))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("division by zero"), "got: {err:#}");
    assert_matches!(
        err.downcast_ref::<tohls_core::Error>(),
        Some(tohls_core::Error::Probe(_))
    );
    assert!(encoded.lock().unwrap().is_empty());
    assert!(!dir.path().join("clip.mp4.master.m3u8").exists());
}

#[tokio::test]
async fn first_encode_failure_stops_the_file() {
    let dir = tempdir().unwrap();
    let (insp, _) = inspector("1920,1080,25/1");
    let encoder = RecordingEncoder {
        fail_height: Some(720),
        ..RecordingEncoder::default()
    };
    let encoded = encoder.encoded.clone();

    let pipeline =
        LadderPipeline::new(Box::new(insp), Box::new(encoder)).with_output_dir(dir.path());
    let err = pipeline
        .process_file(&formats(&["360p::", "720p::", "1080p::"]), Path::new("clip.mp4"))
        .await
        .unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("unable to convert to 1280x720"), "got: {msg}");
    assert!(msg.contains("encoder crashed"), "got: {msg}");
    assert_eq!(*encoded.lock().unwrap(), vec![(640, 360)]);
    assert!(!dir.path().join("clip.mp4.master.m3u8").exists());
}

#[tokio::test]
async fn run_stops_at_first_failing_file() {
    let dir = tempdir().unwrap();
    let (insp, probes) = inspector("1280,720,30/1");
    let pipeline = LadderPipeline::new(Box::new(insp), Box::new(RecordingEncoder::default()))
        .with_output_dir(dir.path());

    let inputs = vec![
        PathBuf::from("first.mp4"),
        PathBuf::from("broken.mp4"),
        PathBuf::from("third.mp4"),
    ];
    let err = pipeline
        .run(&formats(&["360p::"]), &inputs)
        .await
        .unwrap_err();

    assert!(
        err.to_string().contains("Error while processing file 'broken.mp4'"),
        "got: {err:#}"
    );
    assert_eq!(probes.load(Ordering::SeqCst), 2);
    assert!(dir.path().join("first.mp4.master.m3u8").exists());
    assert!(!dir.path().join("third.mp4.master.m3u8").exists());
}

#[tokio::test]
async fn run_returns_every_master_path() {
    let dir = tempdir().unwrap();
    let (insp, _) = inspector("1280,720,30/1");
    let pipeline = LadderPipeline::new(Box::new(insp), Box::new(RecordingEncoder::default()))
        .with_output_dir(dir.path());

    let inputs = vec![PathBuf::from("a.mov"), PathBuf::from("b.mkv")];
    let masters = pipeline.run(&formats(&["360p::"]), &inputs).await.unwrap();

    assert_eq!(
        masters,
        vec![
            dir.path().join("a.mov.master.m3u8"),
            dir.path().join("b.mkv.master.m3u8"),
        ]
    );
}

#[tokio::test]
async fn concurrent_encodes_keep_declared_order() {
    let dir = tempdir().unwrap();
    let (insp, _) = inspector("1920,1080,30/1");
    let encoder = RecordingEncoder {
        stagger: true,
        ..RecordingEncoder::default()
    };
    let encoded = encoder.encoded.clone();

    let pipeline = LadderPipeline::new(Box::new(insp), Box::new(encoder))
        .with_output_dir(dir.path())
        .with_jobs(3);
    let master = pipeline
        .process_file(&formats(&["360p::", "720p::", "1080p::"]), Path::new("clip.mp4"))
        .await
        .unwrap();

    // The smallest rendition sleeps longest, so completion order is reversed.
    assert_eq!(
        *encoded.lock().unwrap(),
        vec![(1920, 1080), (1280, 720), (640, 360)]
    );

    let text = std::fs::read_to_string(master).unwrap();
    let resolutions: Vec<&str> = text
        .lines()
        .filter_map(|l| l.split("RESOLUTION=").nth(1))
        .collect();
    assert_eq!(resolutions, vec!["640x360", "1280x720", "1920x1080"]);
}

#[tokio::test]
async fn duplicate_resolution_fails_before_encoding() {
    let dir = tempdir().unwrap();
    let (insp, _) = inspector("3840,2160,30/1");
    let encoder = RecordingEncoder::default();
    let encoded = encoder.encoded.clone();

    let pipeline = LadderPipeline::new(Box::new(insp), Box::new(encoder))
        .with_output_dir(dir.path())
        .with_jobs(2);
    let err = pipeline
        .process_file(&formats(&["720p::", "1280x720:60:0.15"]), Path::new("clip.mp4"))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("both resolve to 1280x720"), "got: {err:#}");
    assert_matches!(
        err.downcast_ref::<tohls_core::Error>(),
        Some(tohls_core::Error::Validation(_))
    );
    assert!(encoded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn plan_file_does_not_encode() {
    let (insp, _) = inspector("3840,2160,24000/1001");
    let encoder = RecordingEncoder::default();
    let encoded = encoder.encoded.clone();
    let pipeline = LadderPipeline::new(Box::new(insp), Box::new(encoder));

    let ladder = pipeline
        .plan_file(&formats(&["1080p::", "480p:24:0.07"]), Path::new("film.mkv"))
        .await
        .unwrap();

    assert_eq!(ladder.len(), 2);
    assert_eq!((ladder[0].width, ladder[0].height), (1920, 1080));
    assert!((ladder[0].frame_rate - 23.976).abs() < 0.001);
    assert_eq!((ladder[1].width, ladder[1].height), (854, 480));
    assert_eq!(ladder[1].frame_rate, 24.0);
    assert!(encoded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn creates_missing_output_dir() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("hls").join("drone");
    let (insp, _) = inspector("1280,720,30/1");
    let pipeline = LadderPipeline::new(Box::new(insp), Box::new(RecordingEncoder::default()))
        .with_output_dir(&out);

    let master = pipeline
        .process_file(&formats(&["360p::"]), Path::new("drone.mp4"))
        .await
        .unwrap();
    assert!(master.starts_with(&out));
    assert!(master.exists());
}
