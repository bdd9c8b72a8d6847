// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32F746 Clocks
//!
//! The constants describe the STM32F746G-DISCO board: the HSE pin is driven by the 25MHz
//! output of the Ethernet PHY oscillator and VDD is 3.3V.

use stm32f7xx::clocks::clocks::ClockConfig;
use stm32f7xx::clocks::pll_config::PllConfiguration;
use stm32f7xx::rcc::HseMode;

use crate::chip_specs::Stm32f746Specs;

/// STM32F746 Clocks
pub type Clocks<'a> = stm32f7xx::clocks::Clocks<'a, Stm32f746Specs>;

/// HSE frequency of the discovery board
pub const HSE_FREQUENCY_HZ: u32 = 25_000_000;

/// VDD of the discovery board
pub const SUPPLY_VOLTAGE_MV: u32 = 3300;

pub const DISCOVERY_CLOCK_CONFIG: ClockConfig = ClockConfig {
    hse_frequency_hz: HSE_FREQUENCY_HZ,
    hse_mode: HseMode::BYPASS,
    supply_voltage_mv: SUPPLY_VOLTAGE_MV,
};

/// 200MHz system clock
pub const MAIN_PLL_200MHZ: PllConfiguration = PllConfiguration::main_200mhz(HSE_FREQUENCY_HZ);

/// 216MHz system clock
pub const MAIN_PLL_216MHZ: PllConfiguration = PllConfiguration::main_216mhz(HSE_FREQUENCY_HZ);

/// Fastest system clock
pub const MAIN_PLL_MAX: PllConfiguration = PllConfiguration::main_max(HSE_FREQUENCY_HZ);

/// 48MHz for USB OTG FS and SDMMC through PLLSAI
pub const PLLSAI_48MHZ: PllConfiguration = PllConfiguration::sai_48mhz(HSE_FREQUENCY_HZ);
