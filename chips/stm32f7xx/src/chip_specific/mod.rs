// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! This module contains all chip-specific code.
//!
//! Models in the STM32F7 family differ in their frequency limits and in their flash wait-state
//! tables. The drivers of this crate are generic over a `ChipSpecs` type that a chip crate
//! implements with its own values.

pub mod clock_constants;
pub mod flash;

/// Every chip-specific trait a chip crate must implement
pub trait ChipSpecs: clock_constants::ClockConstants + flash::FlashChipSpecific {}

impl<T: clock_constants::ClockConstants + flash::FlashChipSpecific> ChipSpecs for T {}
