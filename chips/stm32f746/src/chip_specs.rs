// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32F746 specifications

use stm32f7xx::chip_specific::clock_constants::SystemClockConstants;
use stm32f7xx::chip_specific::flash::FlashChipSpecific;
use stm32f7xx::flash::{FlashLatency, WaitStateRow};

pub enum Stm32f746Specs {}

// APB1 54MHz, APB2 108MHz, SYSCLK 216MHz
impl SystemClockConstants for Stm32f746Specs {}

/// Maximum HCLK frequency in MHz for 0, 1, 2, ... wait states, per supply voltage range.
/// See table 7 in RM0385.
pub const WAIT_STATE_TABLE: [WaitStateRow; 5] = [
    WaitStateRow {
        min_voltage_mv: 2700,
        max_frequency_mhz: [30, 60, 90, 120, 150, 180, 210, 216, 0, 0, 0],
    },
    WaitStateRow {
        min_voltage_mv: 2400,
        max_frequency_mhz: [24, 48, 72, 96, 120, 144, 168, 192, 216, 0, 0],
    },
    WaitStateRow {
        min_voltage_mv: 2100,
        max_frequency_mhz: [22, 44, 66, 88, 110, 132, 154, 176, 198, 216, 0],
    },
    // Over-drive is unavailable below 2.1V, so 180MHz is the ceiling
    WaitStateRow {
        min_voltage_mv: 1800,
        max_frequency_mhz: [20, 40, 60, 80, 100, 120, 140, 160, 180, 0, 0],
    },
    WaitStateRow::END,
];

impl FlashChipSpecific for Stm32f746Specs {
    const WAIT_STATE_TABLE: &'static [WaitStateRow] = &WAIT_STATE_TABLE;
    const MAX_WAIT_STATES: FlashLatency = FlashLatency::Latency9;
}
