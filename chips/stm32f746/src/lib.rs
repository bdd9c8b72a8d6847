// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32F746 clock tree: chip limits, flash wait states and board presets.

#![cfg_attr(not(test), no_std)]

pub use stm32f7xx::{chip_specific, flash, rcc, spin, ClockError};

pub mod chip_specs;
pub mod clocks;
