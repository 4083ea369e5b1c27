// tests/file_tests.rs
mod common;

use common::{BurstFields, DiveFileBuilder};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use zonar_rs::*;

fn write_dives(dir: &TempDir, count: i16) -> Vec<PathBuf> {
    (1..=count)
        .map(|dive| {
            let path = dir.path().join(format!("zonar{:04}.dat", dive));
            let data = DiveFileBuilder::new()
                .dive_start(dive)
                .burst(&BurstFields::new(1, 2, 2, 10 * dive, 1001, &[2000, 2100, 2200, 2300]))
                .average(2, 10 * dive, 1011, &[3000, 3100, 3200])
                .eof()
                .build();
            fs::write(&path, data).unwrap();
            path
        })
        .collect()
}

#[test]
fn test_open_and_decode_file() {
    let dir = TempDir::new().unwrap();
    let paths = write_dives(&dir, 1);

    let source = ByteSource::open(&paths[0]).unwrap();
    let dive = source.decode(&CalibrationConfig::default()).unwrap();
    assert!(dive.is_complete());
    assert_eq!(dive.bytes_consumed(), source.len());
    assert_eq!(dive.bursts().len(), 1);
    assert_eq!(dive.averages().len(), 1);
    assert_eq!(dive.samples().len(), 7);
    assert!(dive.samples().iter().all(|s| s.backscatter.is_some()));
}

#[test]
fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = ByteSource::open(dir.path().join("nope.dat"));
    assert!(matches!(result, Err(ZonarError::Io(_))));
}

#[cfg(feature = "mmap")]
#[test]
fn test_mmap_decode_matches_read() {
    let dir = TempDir::new().unwrap();
    let paths = write_dives(&dir, 1);
    let config = CalibrationConfig::default();

    let read = ByteSource::open(&paths[0]).unwrap().decode(&config).unwrap();
    let mapped = ByteSource::open_mmap(&paths[0]).unwrap().decode(&config).unwrap();
    assert_eq!(read.samples(), mapped.samples());
}

#[test]
fn test_batch_decode_directory() {
    let dir = TempDir::new().unwrap();
    let paths = write_dives(&dir, 5);

    let results = BatchDecoder::new(CalibrationConfig::default())
        .with_num_threads(2)
        .decode_files(&paths);
    assert_eq!(results.len(), 5);

    for (i, result) in results.iter().enumerate() {
        let dive = result.as_ref().unwrap();
        assert_eq!(dive.dive_number(), Some(i as i16 + 1));
        assert_eq!(dive.samples()[0].pressure_raw, 10 * (i as i16 + 1));
    }
}

#[test]
fn test_batch_reports_partial_files() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_dives(&dir, 2);
    let data = fs::read(&paths[1]).unwrap();
    fs::write(&paths[1], &data[..data.len() - 20]).unwrap();
    paths.push(dir.path().join("absent.dat"));

    let results = BatchDecoder::new(CalibrationConfig::default()).decode_files(&paths);
    assert!(results[0].as_ref().unwrap().is_complete());

    let partial = results[1].as_ref().unwrap();
    assert_eq!(partial.error().map(ZonarError::kind), Some(ErrorKind::TruncatedStream));
    assert_eq!(partial.bursts().len(), 1);
    assert!(partial.averages().is_empty());

    assert!(results[2].is_err());
}

#[cfg(feature = "serde")]
#[test]
fn test_calibration_from_json() {
    let json = r#"{ "gain": [52.5, 53.0], "sound_speed": 1490.0 }"#;
    let config: CalibrationConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.gain, [52.5, 53.0]);
    assert_eq!(config.sound_speed, 1490.0);
    // Unlisted fields keep their defaults
    assert_eq!(config.noise, CalibrationConfig::default().noise);
    assert!(config.validate().is_ok());
}

#[cfg(feature = "serde")]
#[test]
fn test_samples_serialize() {
    let dir = TempDir::new().unwrap();
    let paths = write_dives(&dir, 1);
    let dive = ByteSource::open(&paths[0]).unwrap().decode(&CalibrationConfig::default()).unwrap();

    let json = serde_json::to_string(&dive.samples()[0]).unwrap();
    let back: DecodedSample = serde_json::from_str(&json).unwrap();
    assert_eq!(back.raw_count, dive.samples()[0].raw_count);
    assert_eq!(back.source, dive.samples()[0].source);
}
