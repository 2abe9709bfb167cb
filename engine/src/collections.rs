// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Containers allocated from a [`LinearAllocator`](crate::allocators::LinearAllocator).

mod vec;

pub use vec::FixedVec;
