// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

pub mod clocks;
pub mod divisor;
pub mod hse;
pub mod hsi;
pub mod pll;
pub mod pll_aux;
pub mod pll_config;

pub use crate::clocks::clocks::Clocks;
