use std::{fs::File, path::Path, sync::Arc};

use async_trait::async_trait;
use rubato::{FftFixedIn, Resampler};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::{MediaSourceStream, MediaSourceStreamOptions},
    meta::MetadataOptions,
    probe::Hint,
};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::error::SttError;

use super::Transcriber;

/// Whisper expects 16kHz mono input
const WHISPER_SAMPLE_RATE: usize = 16_000;
const RESAMPLE_CHUNK: usize = 1024;

/// In-process whisper.cpp inference
///
/// The model is loaded once; each call creates its own decoding state so
/// concurrent requests do not share mutable inference buffers.
pub(crate) struct LocalWhisperTranscriber {
    ctx: Arc<WhisperContext>,
    threads: Option<u16>,
}

impl LocalWhisperTranscriber {
    pub fn load(model_path: &Path, threads: Option<u16>) -> crate::Result<Self> {
        let path = model_path
            .to_str()
            .ok_or_else(|| SttError::ConfigError(format!("model path is not valid UTF-8: {}", model_path.display())))?;

        tracing::info!(model = %model_path.display(), "loading whisper model");

        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| SttError::ModelError(format!("failed to load {}: {e}", model_path.display())))?;

        Ok(Self {
            ctx: Arc::new(ctx),
            threads,
        })
    }
}

#[async_trait]
impl Transcriber for LocalWhisperTranscriber {
    async fn transcribe(&self, audio: &Path, language: &str) -> crate::Result<String> {
        let ctx = Arc::clone(&self.ctx);
        let threads = self.threads;
        let audio = audio.to_path_buf();
        let language = language.to_string();

        tokio::task::spawn_blocking(move || {
            let samples = decode_to_whisper_input(&audio)?;

            tracing::debug!(samples = samples.len(), language = %language, "running local whisper inference");

            run_inference(&ctx, &samples, &language, threads)
        })
        .await
        .map_err(|e| SttError::InternalError(format!("transcription task failed: {e}")))?
    }

    fn name(&self) -> &str {
        "local"
    }
}

fn run_inference(ctx: &WhisperContext, samples: &[f32], language: &str, threads: Option<u16>) -> crate::Result<String> {
    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

    params.set_language(Some(language));
    params.set_translate(false);
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    if let Some(threads) = threads {
        params.set_n_threads(i32::from(threads));
    }

    let mut state = ctx
        .create_state()
        .map_err(|e| SttError::ModelError(format!("failed to create whisper state: {e}")))?;

    state
        .full(params, samples)
        .map_err(|e| SttError::ModelError(format!("inference failed: {e}")))?;

    let segments = state
        .full_n_segments()
        .map_err(|e| SttError::ModelError(e.to_string()))?;

    let mut text = String::new();
    for i in 0..segments {
        let segment = state
            .full_get_segment_text(i)
            .map_err(|e| SttError::ModelError(format!("segment {i}: {e}")))?;
        text.push_str(&segment);
    }

    Ok(text.trim().to_string())
}

/// Decode any supported container to mono f32 at 16kHz
fn decode_to_whisper_input(path: &Path) -> crate::Result<Vec<f32>> {
    let (samples, sample_rate) = decode_mono(path)?;
    resample(&samples, sample_rate)
}

#[allow(clippy::cast_precision_loss)]
fn decode_mono(path: &Path) -> crate::Result<(Vec<f32>, usize)> {
    let file = File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, stream, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| SttError::AudioDecode(format!("unsupported audio format: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SttError::AudioDecode("no audio track found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| SttError::AudioDecode("unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| SttError::AudioDecode(format!("unsupported codec: {e}")))?;

    let mut mono = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(SttError::AudioDecode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // corrupt frame, skip it
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!("skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(SttError::AudioDecode(e.to_string())),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);

        mono.extend(
            buffer
                .samples()
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    }

    if mono.is_empty() {
        return Err(SttError::AudioDecode("audio contains no samples".to_string()));
    }

    Ok((mono, sample_rate as usize))
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn resample(samples: &[f32], input_rate: usize) -> crate::Result<Vec<f32>> {
    if input_rate == WHISPER_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f32>::new(input_rate, WHISPER_SAMPLE_RATE, RESAMPLE_CHUNK, 2, 1)
        .map_err(|e| SttError::AudioDecode(format!("failed to create resampler: {e}")))?;

    let chunk = resampler.input_frames_next();
    let mut output = Vec::with_capacity(samples.len() * WHISPER_SAMPLE_RATE / input_rate + chunk);

    let mut chunks = samples.chunks_exact(chunk);
    for frames in &mut chunks {
        let resampled = resampler
            .process(&[frames], None)
            .map_err(|e| SttError::AudioDecode(format!("resampling failed: {e}")))?;
        output.extend_from_slice(&resampled[0]);
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let mut padded = remainder.to_vec();
        padded.resize(chunk, 0.0);

        let resampled = resampler
            .process(&[padded], None)
            .map_err(|e| SttError::AudioDecode(format!("resampling failed: {e}")))?;

        let expected = (remainder.len() as f64 * WHISPER_SAMPLE_RATE as f64 / input_rate as f64).ceil() as usize;
        output.extend_from_slice(&resampled[0][..expected.min(resampled[0].len())]);
    }

    Ok(output)
}
