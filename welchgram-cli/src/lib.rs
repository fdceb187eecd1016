//! Audio decoding and PNG encoding around the `welchgram` pipeline.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder};
use log::{debug, info};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use welchgram::{spectrogram, PixelGrid, Spectrogram, SpectrogramConfig, Waveform};

/// Channel consumed from multi-channel input.
const CHANNEL: usize = 0;

/// Mode of written images, matching `File::create` under a 022 umask.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// Decode the first channel of an audio file.
///
/// WAV files go through `hound`; anything else is probed by `symphonia`.
pub fn read_audio(path: &Path) -> Result<Waveform> {
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
    {
        return read_wav(path);
    }
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "no supported audio tracks"))?;
    let track_id = track.id;
    let params = track.codec_params.clone();
    let n_frames = params.n_frames;
    let mut decoder = get_codecs().make(&params, &DecoderOptions::default())?;
    let sample_rate = params
        .sample_rate
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "unknown sample rate"))?;
    let channels = params
        .channels
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "unknown channel count"))?
        .count();
    if channels == 0 {
        bail!("audio track has no channels");
    }

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f64>> = None;

    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() != track_id {
                    continue;
                }
                // A corrupt packet aborts the whole decode.
                let decoded = decoder.decode(&packet)?;
                let frames = decoded.frames();
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f64>::new(decoded.capacity() as u64, *decoded.spec())
                });
                buf.copy_interleaved_ref(decoded);
                let slice = &buf.samples()[..frames * channels];
                samples.extend(slice.iter().skip(CHANNEL).step_by(channels));
            }
            Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(n) = n_frames {
        samples.truncate(n as usize);
    }
    debug!("symphonia decoded {} frames of {} channels", samples.len(), channels);
    Ok(Waveform::new(samples, sample_rate))
}

fn read_wav(path: &Path) -> Result<Waveform> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels);
    if channels == 0 {
        bail!("WAV header declares no channels");
    }
    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1u64 << (spec.bits_per_sample.max(1) - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()?
        }
    };
    let samples: Vec<f64> = interleaved
        .into_iter()
        .skip(CHANNEL)
        .step_by(channels)
        .collect();
    debug!(
        "hound decoded {} frames ({} channels, {} bits {:?})",
        samples.len(),
        channels,
        spec.bits_per_sample,
        spec.sample_format
    );
    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Write `grid` as an 8-bit grayscale PNG.
///
/// The image is encoded into a temporary file next to `path` and renamed
/// into place once complete, so a failed write leaves nothing behind.
pub fn save_png(grid: &PixelGrid, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".welchgram-")
        .suffix(".png")
        .tempfile_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let encoder =
            PngEncoder::new_with_quality(&mut writer, CompressionType::Best, FilterType::Adaptive);
        encoder.write_image(
            grid.as_raw(),
            grid.width() as u32,
            grid.height() as u32,
            ColorType::L8,
        )?;
        writer.flush()?;
    }
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        // Temp files start out owner-only.
        tmp.as_file().set_permissions(Permissions::from_mode(OUTPUT_MODE))?;
    }
    tmp.persist(path)?;
    Ok(())
}

/// Decode `input`, render its spectrogram and write it to `output`.
pub fn run(input: &Path, output: &Path, config: &SpectrogramConfig) -> Result<Spectrogram> {
    let waveform = read_audio(input)
        .with_context(|| format!("cannot decode audio file `{}`", input.display()))?;
    info!(
        "decoded {} samples at {} Hz ({:.2}s)",
        waveform.len(),
        waveform.sample_rate,
        waveform.duration_secs()
    );
    let out = spectrogram(&waveform, config)?;
    save_png(&out.grid, output)
        .with_context(|| format!("cannot write image `{}`", output.display()))?;
    Ok(out)
}
