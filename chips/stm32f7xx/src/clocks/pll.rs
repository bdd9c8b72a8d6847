// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Main phase-locked loop (PLL) clock driver for the STM32F7xx family. [^doc_ref]
//!
//! The main PLL feeds the system clock multiplexer through its P output and the 48MHz domain
//! through its Q output. Its source and M divider are shared with PLLSAI and PLLI2S, so it must
//! be configured before either of them.
//!
//! # Usage
//!
//! For the purposes of brevity, any error checking has been removed. In real applications, always
//! check the return values of the [Pll] methods.
//!
//! First, get a reference to the [Pll] struct:
//! ```rust,ignore
//! let pll = &clocks.pll;
//! ```
//!
//! ## Configure and start the clock
//!
//! ```rust,ignore
//! pll.configure(&PllConfiguration::main_200mhz(25_000_000));
//! ```
//!
//! ## Reconfigure the clock
//!
//! The PLL can't be reconfigured while it drives the system clock. Use
//! [crate::clocks::Clocks::configure_main_pll], which moves the core to HSI first.
//!
//! [^doc_ref]: See 5.2.3 in RM0385.

use core::cell::Cell;

use crate::clocks::pll_config::{PllConfiguration, PllParameter};
use crate::errorcode::ClockError;
use crate::rcc::{Rcc, SysClockSource, PLLP};
use crate::spin::{wait_until, Spin};

/// Main PLL clock structure.
pub struct Pll<'a> {
    rcc: &'a Rcc<'a>,
    spin: &'a dyn Spin,
    // Set by the first successful configuration and never cleared
    configured: Cell<bool>,
}

impl<'a> Pll<'a> {
    pub(in crate::clocks) fn new(rcc: &'a Rcc<'a>, spin: &'a dyn Spin) -> Self {
        Self {
            rcc,
            spin,
            configured: Cell::new(false),
        }
    }

    /// Program the PLL factors and start the PLL.
    ///
    /// The configuration is validated before any register is written. The entry clock must
    /// already be running.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InvalidPll]\): a factor is out of range. Nothing was written.
    /// + [Err]\([ClockError::InUse]\): the PLL drives the system clock.
    /// + [Err]\([ClockError::Busy]\): the PLL didn't unlock or lock in time.
    pub fn configure(&self, config: &PllConfiguration) -> Result<(), ClockError> {
        config.validate()?;
        let pllp = PLLP::try_from(config.p).map_err(|()| PllParameter::P)?;

        self.disable()?;

        self.rcc
            .set_pll_clocks_factors(config.source, config.m, config.n, pllp, config.q);

        self.enable()?;
        self.configured.set(true);

        log::debug!("main PLL configured: {:?}", config);
        Ok(())
    }

    /// Start the PLL clock with the factors already in PLLCFGR.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): if the PLL didn't lock in time. Recall this method to
    /// ensure the PLL clock is running.
    pub fn enable(&self) -> Result<(), ClockError> {
        self.rcc.enable_pll_clock();

        wait_until(self.spin, || self.rcc.is_locked_pll_clock()).inspect_err(|_| {
            log::error!("main PLL didn't lock");
        })
    }

    /// Stop the PLL clock.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InUse]\): if the PLL clock is configured as the system clock.
    /// + [Err]\([ClockError::Busy]\): if the PLL didn't unlock in time.
    pub fn disable(&self) -> Result<(), ClockError> {
        if self.rcc.get_sys_clock_source() == SysClockSource::PLL {
            return Err(ClockError::InUse);
        }

        self.rcc.disable_pll_clock();

        wait_until(self.spin, || !self.rcc.is_locked_pll_clock()).inspect_err(|_| {
            log::error!("main PLL didn't unlock");
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.rcc.is_enabled_pll_clock()
    }

    pub fn is_locked(&self) -> bool {
        self.rcc.is_locked_pll_clock()
    }

    /// Whether [Pll::configure] ever succeeded.
    pub fn is_configured(&self) -> bool {
        self.configured.get()
    }

    /// Factors currently programmed in PLLCFGR.
    pub fn get_configuration(&self) -> PllConfiguration {
        PllConfiguration {
            source: self.rcc.get_pll_clocks_source(),
            m: self.rcc.get_pll_clocks_m_divider(),
            n: self.rcc.get_pll_clock_n_multiplier(),
            p: self.rcc.get_pll_clock_p_divider().into(),
            q: self.rcc.get_pll_clock_q_divider(),
            r: self.rcc.get_pll_clock_r_divider(),
        }
    }

    /// Frequency of the P output, if the PLL is enabled.
    pub fn get_frequency_hz(&self, hse_frequency_hz: u32) -> Option<u32> {
        if self.is_enabled() {
            Some(
                self.get_configuration()
                    .calculate_main_output(hse_frequency_hz),
            )
        } else {
            None
        }
    }
}
