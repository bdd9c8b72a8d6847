// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock tree drivers for the STM32F7 family.
//!
//! The crate is split the same way the hardware is: [rcc] and [flash] hold the register maps
//! and typed accessors, [clocks] holds the oscillator and PLL drivers together with the
//! [clocks::Clocks] state machine that moves the core between clock configurations.
//! Chip models plug their limits in through [chip_specific].

#![cfg_attr(not(test), no_std)]

pub mod chip_specific;
pub mod clocks;
pub mod errorcode;
pub mod flash;
pub mod rcc;
pub mod spin;
pub mod support;

#[cfg(test)]
pub(crate) mod virtual_chip;

pub use crate::errorcode::ClockError;
