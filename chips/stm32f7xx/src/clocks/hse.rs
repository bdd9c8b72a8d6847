// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! HSE (high-speed external) clock driver for the STM32F7xx family. [^doc_ref]
//!
//! # Usage
//!
//! First, get a reference to the [Hse] struct:
//! ```rust,ignore
//! let hse = &clocks.hse;
//! ```
//!
//! ## Start the clock
//!
//! ```rust,ignore
//! hse.enable(HseMode::BYPASS)?;
//! ```
//!
//! ## Get the frequency of the clock
//! ```rust,ignore
//! let hse_frequency_hz = hse.get_frequency_hz();
//! ```
//!
//! [^doc_ref]: See 5.2.1 in RM0385.

use crate::errorcode::ClockError;
use crate::rcc::{HseMode, Rcc, SysClockSource};
use crate::spin::{wait_until, Spin};

/// Main HSE clock structure
pub struct Hse<'a> {
    rcc: &'a Rcc<'a>,
    spin: &'a dyn Spin,
    frequency_hz: u32,
}

impl<'a> Hse<'a> {
    pub(in crate::clocks) fn new(rcc: &'a Rcc<'a>, spin: &'a dyn Spin, frequency_hz: u32) -> Self {
        Self {
            rcc,
            spin,
            frequency_hz,
        }
    }

    /// Start the HSE clock and wait until it is stable.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): if the HSE clock didn't become ready in time. This is the
    /// usual outcome when no oscillator or crystal is fitted.
    pub fn enable(&self, source: HseMode) -> Result<(), ClockError> {
        if !self.rcc.is_enabled_hse_clock() {
            // HSEBYP is only writable while the oscillator is off
            self.rcc.set_hse_clock_bypass(source == HseMode::BYPASS);
        }

        self.rcc.enable_hse_clock();

        wait_until(self.spin, || self.rcc.is_ready_hse_clock()).inspect_err(|_| {
            log::error!("HSE not ready");
        })
    }

    /// Stop the HSE clock.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InUse]\): if the HSE clock is configured as the system clock.
    /// + [Err]\([ClockError::Busy]\): if the HSE clock didn't stop in time.
    pub fn disable(&self) -> Result<(), ClockError> {
        if self.rcc.get_sys_clock_source() == SysClockSource::HSE {
            return Err(ClockError::InUse);
        }

        self.rcc.disable_hse_clock();

        wait_until(self.spin, || !self.rcc.is_ready_hse_clock())
    }

    /// Check whether the HSE clock is enabled or not.
    pub fn is_enabled(&self) -> bool {
        self.rcc.is_enabled_hse_clock()
    }

    /// Nominal frequency of the external oscillator, whether it runs or not.
    pub fn nominal_frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Frequency of the HSE clock, if it is enabled.
    pub fn get_frequency_hz(&self) -> Option<u32> {
        if self.is_enabled() {
            Some(self.frequency_hz)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rcc::CR;
    use crate::virtual_chip::VirtualChip;
    use tock_registers::interfaces::Readable;

    const HSE_FREQUENCY_HZ: u32 = 25_000_000;

    #[test]
    fn bypass_set_before_start() {
        let chip = VirtualChip::new();
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let hse = Hse::new(&rcc, &chip, HSE_FREQUENCY_HZ);

        assert_eq!(None, hse.get_frequency_hz());
        assert_eq!(Ok(()), hse.enable(HseMode::BYPASS));
        assert!(chip.rcc_registers().cr.is_set(CR::HSEBYP));
        assert!(chip.rcc_registers().cr.is_set(CR::HSERDY));
        assert_eq!(Some(HSE_FREQUENCY_HZ), hse.get_frequency_hz());

        // Enabling a running clock is harmless
        assert_eq!(Ok(()), hse.enable(HseMode::BYPASS));
        assert_eq!(Ok(()), hse.disable());
        assert!(!hse.is_enabled());
        assert_eq!(HSE_FREQUENCY_HZ, hse.nominal_frequency_hz());
    }

    #[test]
    fn crystal_mode_leaves_bypass_clear() {
        let chip = VirtualChip::new();
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let hse = Hse::new(&rcc, &chip, HSE_FREQUENCY_HZ);

        assert_eq!(Ok(()), hse.enable(HseMode::CRYSTAL));
        assert!(!chip.rcc_registers().cr.is_set(CR::HSEBYP));
    }

    #[test]
    fn missing_oscillator_times_out() {
        let chip = VirtualChip::new();
        chip.stick(CR::HSERDY.mask << CR::HSERDY.shift);
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let hse = Hse::new(&rcc, &chip, HSE_FREQUENCY_HZ);

        assert_eq!(Err(ClockError::Busy), hse.enable(HseMode::BYPASS));
        assert!(hse.is_enabled());
    }
}
