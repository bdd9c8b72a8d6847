// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock-related constants for a particular chip

use crate::clocks::divisor;

/// Generic clock constants for a specific chip
pub trait SystemClockConstants {
    /// Maximum allowed APB1 frequency in Hz
    const APB1_FREQUENCY_LIMIT_HZ: u32 = 54_000_000;
    /// Maximum allowed APB2 frequency in Hz
    const APB2_FREQUENCY_LIMIT_HZ: u32 = 108_000_000;
    /// Maximum allowed system clock frequency in Hz
    const SYS_CLOCK_FREQUENCY_LIMIT_HZ: u32 = 216_000_000;
}

/// Clock constants for a specific chip
pub trait ClockConstants: SystemClockConstants {
    /// Smallest APB1 divisor that keeps APB1 legal at any system clock frequency
    fn safe_apb1_divisor() -> u32 {
        safe_divisor(Self::SYS_CLOCK_FREQUENCY_LIMIT_HZ, Self::APB1_FREQUENCY_LIMIT_HZ)
    }

    /// Smallest APB2 divisor that keeps APB2 legal at any system clock frequency
    fn safe_apb2_divisor() -> u32 {
        safe_divisor(Self::SYS_CLOCK_FREQUENCY_LIMIT_HZ, Self::APB2_FREQUENCY_LIMIT_HZ)
    }
}

impl<T: SystemClockConstants> ClockConstants for T {}

fn safe_divisor(frequency_hz: u32, limit_hz: u32) -> u32 {
    if limit_hz == 0 {
        return 16;
    }
    divisor::largest_power_of_two(frequency_hz.div_ceil(limit_hz))
}
