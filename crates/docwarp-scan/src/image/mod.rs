// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module. Decoding input bytes and encoding scan output.

pub mod codec;

pub use codec::{decode, encode};
