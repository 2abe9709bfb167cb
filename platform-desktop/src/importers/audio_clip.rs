// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs::File, io::ErrorKind, path::Path};

use anyhow::Context;
use platform_abstraction_layer::DecodedAudio;
use symphonia::{
    core::{
        audio::SampleBuffer,
        codecs::DecoderOptions,
        errors::Error as SymphoniaError,
        formats::FormatOptions,
        io::{MediaSourceStream, MediaSourceStreamOptions},
        meta::MetadataOptions,
        probe::Hint,
    },
    default,
};
use tracing::{debug, trace};

/// Decoded audio, as interleaved 16-bit samples.
#[derive(Debug, Clone)]
pub struct ImportedAudio {
    pub channels: u16,
    pub sample_rate: u32,
    /// Interleaved samples, in little-endian byte order regardless of the
    /// host.
    pub samples: Vec<i16>,
}

impl ImportedAudio {
    pub const BIT_DEPTH: u16 = 16;

    pub fn as_decoded(&self) -> DecodedAudio<'_> {
        DecodedAudio {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bit_depth: Self::BIT_DEPTH,
            pcm: bytemuck::cast_slice(&self.samples),
        }
    }
}

pub fn import(audio_path: &Path) -> anyhow::Result<ImportedAudio> {
    debug!("Reading audio data from: {}", audio_path.display());

    let codecs = default::get_codecs();
    let probe = default::get_probe();

    let mut hint = Hint::new();
    if let Some(extension) = audio_path.extension().map(|s| s.to_string_lossy()) {
        hint.with_extension(&extension);
    }

    let file = File::open(audio_path).context("Could not open audio file for reading")?;
    let source = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());
    let mut source = probe
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Could not recognize audio format")?;

    let track = source
        .format
        .default_track()
        .context("The file appears to be an audio file, but without any tracks?")?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16);

    let mut decoder = codecs
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create a decoder for the audio")?;

    let mut samples = Vec::new();
    loop {
        let packet = match source.format.next_packet() {
            Ok(packet) => packet,

            // The stream ends with an unexpected EOF, there's no dedicated
            // end of stream error.
            Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => break,

            // Recoverable, according to the Decoder::decode docs.
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::ResetRequired) => {
                samples.clear();
                decoder = codecs
                    .make(decoder.codec_params(), &DecoderOptions::default())
                    .context("Failed to recreate a decoder for the audio")?;
                continue;
            }

            Err(err) => Err(err).context("Failed to read audio data packet")?,
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .context("Failed to decode audio data packet")?;
        let spec = *decoded.spec();
        trace!("Decoded audio data, {} frames of: {spec:?}", decoded.frames());

        sample_rate = Some(spec.rate);
        channels = Some(spec.channels.count() as u16);
        let mut converted = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        converted.copy_interleaved_ref(decoded);
        samples.extend(converted.samples().iter().map(|sample| sample.to_le()));
    }

    let (Some(channels), Some(sample_rate)) = (channels, sample_rate) else {
        anyhow::bail!("Could not determine the channel count and sample rate of the audio");
    };
    debug!(
        "Decoded {} frames of {channels}-channel {sample_rate} Hz audio from: {}",
        samples.len() / channels.max(1) as usize,
        audio_path.display(),
    );

    Ok(ImportedAudio {
        channels,
        sample_rate,
        samples,
    })
}
