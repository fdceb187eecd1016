// Test intent: verifies decoding of WAV variants and rejection of unreadable input.
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use welchgram_cli::read_audio;

fn write_wav<S: hound::Sample + Copy>(path: &Path, spec: WavSpec, frames: &[Vec<S>]) {
    let mut writer = WavWriter::create(path, spec).unwrap();
    for frame in frames {
        for &s in frame {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn spec(channels: u16, bits: u16, format: SampleFormat) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: 8_000,
        bits_per_sample: bits,
        sample_format: format,
    }
}

#[test]
fn pcm16_is_scaled_to_unit_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pcm16.wav");
    let frames: Vec<Vec<i16>> = vec![vec![0], vec![16_384], vec![-32_768], vec![-16_384]];
    write_wav(&path, spec(1, 16, SampleFormat::Int), &frames);

    let wave = read_audio(&path).unwrap();
    assert_eq!(wave.sample_rate, 8_000);
    assert_eq!(wave.samples, vec![0.0, 0.5, -1.0, -0.5]);
}

#[test]
fn pcm24_uses_its_own_bit_depth() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pcm24.wav");
    let frames: Vec<Vec<i32>> = vec![vec![1 << 22], vec![-(1 << 23)]];
    write_wav(&path, spec(1, 24, SampleFormat::Int), &frames);

    let wave = read_audio(&path).unwrap();
    assert_eq!(wave.samples, vec![0.5, -1.0]);
}

#[test]
fn float_samples_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("float.wav");
    let frames: Vec<Vec<f32>> = vec![vec![0.25], vec![-0.75], vec![1.5]];
    write_wav(&path, spec(1, 32, SampleFormat::Float), &frames);

    let wave = read_audio(&path).unwrap();
    assert_eq!(wave.samples, vec![0.25, -0.75, 1.5]);
}

#[test]
fn stereo_keeps_first_channel_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo.wav");
    let frames: Vec<Vec<i16>> = (0..100).map(|_| vec![16_384, -16_384]).collect();
    write_wav(&path, spec(2, 16, SampleFormat::Int), &frames);

    let wave = read_audio(&path).unwrap();
    assert_eq!(wave.len(), 100);
    assert!(wave.samples.iter().all(|&s| s == 0.5));
}

#[test]
fn probed_container_keeps_first_channel_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo.bin");
    let frames: Vec<Vec<i16>> = (0..3_000).map(|_| vec![16_384, -16_384]).collect();
    write_wav(&path, spec(2, 16, SampleFormat::Int), &frames);

    let wave = read_audio(&path).unwrap();
    assert_eq!(wave.sample_rate, 8_000);
    assert_eq!(wave.len(), 3_000);
    assert!(wave.samples.iter().all(|&s| s == 0.5));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_audio(&dir.path().join("absent.wav")).is_err());
    assert!(read_audio(&dir.path().join("absent.flac")).is_err());
}

#[test]
fn garbage_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["junk.wav", "junk.flac", "junk.mp3"] {
        let path = dir.path().join(name);
        std::fs::write(&path, b"definitely not audio").unwrap();
        assert!(read_audio(&path).is_err(), "{name} decoded");
    }
}
