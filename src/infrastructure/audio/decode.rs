//! Hinted symphonia decoding for object-URL playback
//!
//! The in-memory path only sniffs WAV (PCM/float), FLAC and Ogg Vorbis.
//! Object files are decoded with symphonia instead, with the declared type
//! as probe hint, which also covers MP3, AAC, MP4/M4A, Matroska/WebM and
//! A-law/mu-law WAV.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use rodio::buffer::SamplesBuffer;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::PlaybackError;
use crate::domain::recording::AudioMimeType;

/// Decode the whole file at `path` into interleaved `f32` samples
pub(super) fn decode_file(
    path: &Path,
    mime_type: AudioMimeType,
) -> Result<SamplesBuffer<f32>, PlaybackError> {
    let failed = |message: String| {
        PlaybackError::PlaybackFailed(format!("{} source: {}", mime_type, message))
    };

    let file = File::open(path).map_err(|e| {
        PlaybackError::PlaybackFailed(format!("{}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.mime_type(mime_type.as_str())
        .with_extension(mime_type.extension());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| failed(format!("unrecognised format: {}", e)))?;
    let mut format = probed.format;

    let (track_id, params) = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .map(|t| (t.id, t.codec_params.clone()))
        .ok_or_else(|| failed("no audio track".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| failed(format!("unsupported codec: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut spec = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(failed(format!("read error: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let decoded_spec = *decoded.spec();
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, decoded_spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
                spec.get_or_insert(decoded_spec);
            }
            Err(SymphoniaError::DecodeError(e)) => {
                log::debug!("Skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(failed(format!("decode error: {}", e))),
        }
    }

    let spec = spec.ok_or_else(|| failed("no decodable audio".to_string()))?;
    Ok(SamplesBuffer::new(
        spec.channels.count() as u16,
        spec.rate,
        samples,
    ))
}
