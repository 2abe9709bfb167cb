// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

#[allow(unused_imports)] // used in docs
use super::Pal;

/// Severity of a message passed to [`Pal::log`], from the most to the least
/// severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Something failed and the engine could not recover on its own.
    Error,
    /// Something failed, but the engine can continue without it (e.g. an asset
    /// that couldn't be decoded).
    Warn,
    /// Coarse progress information.
    Info,
    /// Details useful when tracking down a problem.
    Debug,
    /// Very verbose details, e.g. one message per discovered file.
    Trace,
}
