// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! HSI (high-speed internal) clock driver for the STM32F7xx family. [^doc_ref]
//!
//! # Usage
//!
//! First, get a reference to the [Hsi] struct:
//! ```rust,ignore
//! let hsi = &clocks.hsi;
//! ```
//!
//! ## Start the clock
//!
//! ```rust,ignore
//! hsi.enable()?;
//! ```
//!
//! ## Stop the clock
//!
//! ```rust,ignore
//! hsi.disable()?;
//! ```
//!
//! [^doc_ref]: See 5.2.2 in RM0385.

use crate::errorcode::ClockError;
use crate::rcc::{Rcc, SysClockSource};
use crate::spin::{wait_until, Spin};

/// HSI frequency in Hz
pub const HSI_FREQUENCY_HZ: u32 = 16_000_000;

/// Main HSI clock structure
pub struct Hsi<'a> {
    rcc: &'a Rcc<'a>,
    spin: &'a dyn Spin,
}

impl<'a> Hsi<'a> {
    pub(in crate::clocks) fn new(rcc: &'a Rcc<'a>, spin: &'a dyn Spin) -> Self {
        Self { rcc, spin }
    }

    /// Start the HSI clock and wait until it is stable.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): if the HSI clock didn't become ready in time. Recall this
    /// method to ensure the HSI clock is running.
    pub fn enable(&self) -> Result<(), ClockError> {
        self.rcc.enable_hsi_clock();

        wait_until(self.spin, || self.rcc.is_ready_hsi_clock()).inspect_err(|_| {
            log::error!("HSI not ready");
        })
    }

    /// Stop the HSI clock.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InUse]\): if the HSI clock is configured as the system clock.
    /// + [Err]\([ClockError::Busy]\): if the HSI clock didn't stop in time.
    pub fn disable(&self) -> Result<(), ClockError> {
        if self.rcc.get_sys_clock_source() == SysClockSource::HSI {
            return Err(ClockError::InUse);
        }

        self.rcc.disable_hsi_clock();

        wait_until(self.spin, || !self.rcc.is_ready_hsi_clock())
    }

    /// Check whether the HSI clock is enabled or not.
    pub fn is_enabled(&self) -> bool {
        self.rcc.is_enabled_hsi_clock()
    }

    /// Frequency of the HSI clock, if it is enabled.
    pub fn get_frequency_hz(&self) -> Option<u32> {
        if self.is_enabled() {
            Some(HSI_FREQUENCY_HZ)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_chip::VirtualChip;

    #[test]
    fn hsi_runs_after_reset() {
        let chip = VirtualChip::new();
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let hsi = Hsi::new(&rcc, &chip);

        assert!(hsi.is_enabled());
        assert_eq!(Some(HSI_FREQUENCY_HZ), hsi.get_frequency_hz());
        assert_eq!(Ok(()), hsi.enable());
    }

    #[test]
    fn hsi_cannot_stop_while_driving_the_core() {
        let chip = VirtualChip::new();
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let hsi = Hsi::new(&rcc, &chip);

        assert_eq!(Err(ClockError::InUse), hsi.disable());
        assert!(hsi.is_enabled());
    }
}
