// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arena allocation on top of [`Pal::malloc`](platform_abstraction_layer::Pal::malloc).

mod linear_allocator;

pub use linear_allocator::LinearAllocator;
