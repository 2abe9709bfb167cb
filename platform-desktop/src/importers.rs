// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoders for the asset file formats, producing owned buffers that can be
//! viewed as the platform abstraction layer's decoded-data types.

pub mod audio_clip;
pub mod font;
pub mod texture;
