// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::collections::FixedVec;

/// Playable audio track, decoded into interleaved PCM.
#[derive(Debug)]
pub struct AudioAsset<'eng> {
    /// The amount of interleaved channels in `pcm`.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Bits per sample, little-endian signed integers.
    pub bit_depth: u16,
    /// The interleaved samples.
    pub pcm: FixedVec<'eng, u8>,
}

impl AudioAsset<'_> {
    /// Returns the amount of frames (samples per channel) in the clip.
    pub fn frames(&self) -> usize {
        let frame_size = self.channels as usize * (self.bit_depth as usize).div_ceil(8);
        if frame_size == 0 {
            0
        } else {
            self.pcm.len() / frame_size
        }
    }
}
