// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32F7xx clock driver
//!
//! This crate provides drivers for various clocks: HSI, HSE, the main PLL and the two
//! auxiliary PLLs (PLLSAI and PLLI2S). The [Clocks] struct ties them together with the system
//! clock multiplexer, the bus prescalers and the flash latency.
//!
//! Every transition of the core clock follows the same discipline:
//!
//! + before the frequency may rise, the flash latency is raised to its worst case and the APB
//!   prescalers are set to values that are legal at any system clock frequency
//! + the AHB prescaler and the multiplexer are then changed
//! + the core clock frequency is read back from the hardware, the flash latency is lowered to
//!   what that frequency needs and the APB prescalers the caller had are restored when they are
//!   still legal
//!
//! # Usage [^usage_note]
//!
//! First, import the following enums:
//!
//! ```rust,ignore
//! use stm32f7xx::clocks::clocks::{Oscillator, PllUnit};
//! use stm32f7xx::rcc::SysClockSource;
//! ```
//!
//! A reference to the [Clocks] is needed:
//!
//! ```rust,ignore
//! let clocks = &peripherals.clocks;
//! clocks.init();
//! ```
//!
//! ## Run the core from the PLL at 200MHz
//!
//! An unconfigured PLL is set up with the 200MHz preset on the way:
//!
//! ```rust,ignore
//! let report = clocks.set_core_clock(SysClockSource::PLL, 1);
//! ```
//!
//! ## Pick a frequency
//!
//! ```rust,ignore
//! clocks.set_core_clock_frequency(216_000_000);
//! ```
//!
//! ## Configure the 48MHz domain through PLLSAI
//!
//! The main PLL must be configured first since the auxiliary PLLs share its M divider:
//!
//! ```rust,ignore
//! clocks.configure_auxiliary_pll(AuxiliaryPllUnit::Sai, &PllConfiguration::sai_48mhz(25_000_000));
//! ```
//!
//! [^usage_note]: For the purpose of brevity, any error checking has been removed.

use core::cell::Cell;

use crate::chip_specific::ChipSpecs as ChipSpecsTrait;
use crate::clocks::hse::Hse;
use crate::clocks::hsi::{Hsi, HSI_FREQUENCY_HZ};
use crate::clocks::pll::Pll;
use crate::clocks::pll_aux::{AuxiliaryPll, AuxiliaryPllUnit};
use crate::clocks::pll_config::{PllConfiguration, PllOutputFrequencies};
use crate::errorcode::ClockError;
use crate::flash::{Flash, FlashLatency};
use crate::rcc::{AHBPrescaler, APBPrescaler, HseMode, PllSource, Rcc, SysClockSource};
use crate::spin::{wait_until, Spin};
use crate::support;

/// Board-level clock inputs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockConfig {
    /// Nominal frequency of the HSE oscillator or crystal
    pub hse_frequency_hz: u32,
    /// How the HSE pins are driven
    pub hse_mode: HseMode,
    /// VDD, used to pick the flash wait-state row
    pub supply_voltage_mv: u32,
}

/// Oscillator selector
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Oscillator {
    Hsi,
    Hse,
    Pll,
}

/// PLL selector
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PllUnit {
    Main,
    Sai,
    I2s,
}

/// Outcome of an APB prescaler request
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrescalerUpdate {
    Applied,
    /// The bus would have run above its ceiling; the prescaler was left alone
    SkippedAboveCeiling,
}

/// Outcome of restoring an APB prescaler at the end of [Clocks::set_core_clock]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    /// The saved prescaler is illegal at the new frequency, the safe one is kept
    SkippedAboveCeiling,
    /// Writing the saved prescaler failed, the safe one is kept
    Skipped(ClockError),
}

impl From<Result<PrescalerUpdate, ClockError>> for RestoreOutcome {
    fn from(result: Result<PrescalerUpdate, ClockError>) -> Self {
        match result {
            Ok(PrescalerUpdate::Applied) => RestoreOutcome::Restored,
            Ok(PrescalerUpdate::SkippedAboveCeiling) => RestoreOutcome::SkippedAboveCeiling,
            Err(err) => RestoreOutcome::Skipped(err),
        }
    }
}

/// Clock tree state after a successful [Clocks::set_core_clock]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoreClockReport {
    pub core_clock_hz: u32,
    pub flash_latency: FlashLatency,
    pub apb1: RestoreOutcome,
    pub apb2: RestoreOutcome,
}

/// Main struct for configuring on-board clocks.
pub struct Clocks<'a, ChipSpecs> {
    rcc: &'a Rcc<'a>,
    flash: &'a Flash<'a, ChipSpecs>,
    spin: &'a dyn Spin,
    config: ClockConfig,
    /// High speed internal clock
    pub hsi: Hsi<'a>,
    /// High speed external clock
    pub hse: Hse<'a>,
    /// Main phase-locked loop
    pub pll: Pll<'a>,
    /// SAI phase-locked loop
    pub pllsai: AuxiliaryPll<'a>,
    /// I2S phase-locked loop
    pub plli2s: AuxiliaryPll<'a>,
    // HCLK as of the last update_core_clock()
    core_clock_hz: Cell<u32>,
}

impl<'a, ChipSpecs: ChipSpecsTrait> Clocks<'a, ChipSpecs> {
    pub fn new(
        rcc: &'a Rcc<'a>,
        flash: &'a Flash<'a, ChipSpecs>,
        spin: &'a dyn Spin,
        config: ClockConfig,
    ) -> Self {
        Self {
            rcc,
            flash,
            spin,
            config,
            hsi: Hsi::new(rcc, spin),
            hse: Hse::new(rcc, spin, config.hse_frequency_hz),
            pll: Pll::new(rcc, spin),
            pllsai: AuxiliaryPll::new(AuxiliaryPllUnit::Sai, rcc, spin),
            plli2s: AuxiliaryPll::new(AuxiliaryPllUnit::I2s, rcc, spin),
            core_clock_hz: Cell::new(HSI_FREQUENCY_HZ),
        }
    }

    pub fn config(&self) -> ClockConfig {
        self.config
    }

    /// Bring the clock tree to its reset-default configuration.
    ///
    /// The core runs from HSI with the AHB undivided, HSE is started, the APB prescalers are set
    /// to their safe values, the flash latency is set for 16MHz and the ART accelerator is
    /// enabled.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): an oscillator or a register didn't respond in time.
    /// + [Err]\([ClockError::NoWaitStates]\): the supply voltage has no wait-state row.
    pub fn init(&self) -> Result<(), ClockError> {
        self.rcc.disable_clock_interrupts();

        self.hsi.enable()?;
        self.select_sys_clock_source(SysClockSource::HSI)?;
        self.write_ahb_prescaler(AHBPrescaler::DivideBy1)?;
        self.hse.enable(self.config.hse_mode)?;
        self.write_apb1_prescaler(APBPrescaler::from_divisor(ChipSpecs::safe_apb1_divisor()))?;
        self.write_apb2_prescaler(APBPrescaler::from_divisor(ChipSpecs::safe_apb2_divisor()))?;

        let core_clock_hz = self.update_core_clock();
        self.flash
            .configure_wait_states(core_clock_hz, self.config.supply_voltage_mv)?;
        self.flash.enable_art_accelerator();

        log::debug!("clocks initialized, core at {}Hz", core_clock_hz);
        Ok(())
    }

    /* Oscillators */

    /// Start an oscillator and wait until it is ready.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): the oscillator didn't become ready in time.
    pub fn enable_oscillator(&self, oscillator: Oscillator) -> Result<(), ClockError> {
        match oscillator {
            Oscillator::Hsi => self.hsi.enable(),
            Oscillator::Hse => self.hse.enable(self.config.hse_mode),
            Oscillator::Pll => self.enable_pll(),
        }
    }

    /// Stop an oscillator.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InUse]\): the oscillator drives the system clock, directly or
    /// through the main PLL.
    /// + [Err]\([ClockError::Busy]\): the oscillator didn't stop in time.
    pub fn disable_oscillator(&self, oscillator: Oscillator) -> Result<(), ClockError> {
        let pll_source = if self.rcc.get_sys_clock_source() == SysClockSource::PLL {
            Some(self.rcc.get_pll_clocks_source())
        } else {
            None
        };

        match oscillator {
            Oscillator::Hsi if pll_source == Some(PllSource::HSI) => Err(ClockError::InUse),
            Oscillator::Hse if pll_source == Some(PllSource::HSE) => Err(ClockError::InUse),
            Oscillator::Hsi => self.hsi.disable(),
            Oscillator::Hse => self.hse.disable(),
            Oscillator::Pll => self.pll.disable(),
        }
    }

    /* PLLs */

    fn enable_pll_source(&self, source: PllSource) -> Result<(), ClockError> {
        match source {
            PllSource::HSI => self.hsi.enable(),
            PllSource::HSE => self.hse.enable(self.config.hse_mode),
        }
    }

    // Restart the main PLL with the factors in place, its input first
    fn enable_pll(&self) -> Result<(), ClockError> {
        self.enable_pll_source(self.rcc.get_pll_clocks_source())?;
        self.pll.enable()
    }

    /// Program the main PLL.
    ///
    /// If the PLL drives the core, the core is moved to HSI for the duration of the call and
    /// returned to the PLL through [Clocks::set_core_clock] with the same AHB divisor. The core
    /// frequency drops to 16MHz in between.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InvalidPll]\): a factor is out of range. Nothing was written.
    /// + [Err]\([ClockError::Unreachable]\) or [Err]\([ClockError::NoWaitStates]\): the PLL
    /// drives the core and the new output would be too fast for the chip or the flash. Nothing
    /// was written.
    /// + [Err]\([ClockError::Busy]\): an oscillator or the PLL didn't respond in time.
    /// + any error of [Clocks::set_core_clock] when the core is returned to the PLL.
    pub fn configure_main_pll(&self, config: &PllConfiguration) -> Result<(), ClockError> {
        config.validate()?;

        let pll_was_active = self.rcc.get_sys_clock_source() == SysClockSource::PLL;
        let ahb_prescaler = self.rcc.get_ahb_prescaler();

        if pll_was_active {
            self.check_reachable(
                config.calculate_main_output(self.config.hse_frequency_hz),
                ahb_prescaler,
            )?;

            log::debug!("moving the core to HSI to reprogram the main PLL");
            self.hsi.enable()?;
            self.select_sys_clock_source(SysClockSource::HSI)?;
            self.update_core_clock();
        }

        self.enable_pll_source(config.source)?;
        self.pll.configure(config)?;

        if pll_was_active {
            self.set_core_clock(SysClockSource::PLL, ahb_prescaler.into())?;
        }

        Ok(())
    }

    /// Program PLLSAI or PLLI2S.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::MainPllNotConfigured]\): the main PLL was never configured.
    /// Nothing was written.
    /// + [Err]\([ClockError::InvalidPll]\): a factor is out of range. Nothing was written.
    /// + [Err]\([ClockError::Busy]\): the PLL didn't respond in time.
    pub fn configure_auxiliary_pll(
        &self,
        unit: AuxiliaryPllUnit,
        config: &PllConfiguration,
    ) -> Result<(), ClockError> {
        if !self.pll.is_configured() {
            log::warn!("{:?} PLL refused: main PLL not configured", unit);
            return Err(ClockError::MainPllNotConfigured);
        }

        match unit {
            AuxiliaryPllUnit::Sai => self.pllsai.configure(config),
            AuxiliaryPllUnit::I2s => self.plli2s.configure(config),
        }
    }

    /// Factors programmed in a PLL.
    pub fn get_pll_configuration(&self, unit: PllUnit) -> PllConfiguration {
        match unit {
            PllUnit::Main => self.pll.get_configuration(),
            PllUnit::Sai => self.pllsai.get_configuration(),
            PllUnit::I2s => self.plli2s.get_configuration(),
        }
    }

    /// Frequencies produced by the factors programmed in a PLL, whether it runs or not.
    pub fn get_pll_frequencies(&self, unit: PllUnit) -> PllOutputFrequencies {
        self.get_pll_configuration(unit)
            .calculate_all_outputs(self.config.hse_frequency_hz)
    }

    /* System clock */

    pub fn get_sys_clock_source(&self) -> SysClockSource {
        self.rcc.get_sys_clock_source()
    }

    /// Request a new system clock source and wait until the multiplexer reports it.
    ///
    /// The source must be running. No latency or prescaler adjustment is made: use
    /// [Clocks::set_core_clock] to move to a faster clock.
    pub fn select_sys_clock_source(&self, source: SysClockSource) -> Result<(), ClockError> {
        self.rcc.set_sys_clock_source(source);

        wait_until(self.spin, || self.rcc.get_sys_clock_source() == source).inspect_err(|_| {
            log::error!("system clock didn't switch to {:?}", source);
        })
    }

    // System clock frequency the source would produce, from what is programmed today
    fn predict_sys_clock_frequency_hz(&self, source: SysClockSource) -> u32 {
        let hse_frequency_hz = self.config.hse_frequency_hz;
        match source {
            SysClockSource::HSI => HSI_FREQUENCY_HZ,
            SysClockSource::HSE => hse_frequency_hz,
            SysClockSource::PLL if self.pll.is_configured() => self
                .pll
                .get_configuration()
                .calculate_main_output(hse_frequency_hz),
            SysClockSource::PLL => PllConfiguration::main_200mhz(hse_frequency_hz)
                .calculate_main_output(hse_frequency_hz),
        }
    }

    // Start the source, configuring the PLL with the default preset if it never was
    fn start_source(&self, source: SysClockSource) -> Result<(), ClockError> {
        match source {
            SysClockSource::HSI => self.hsi.enable(),
            SysClockSource::HSE => self.hse.enable(self.config.hse_mode),
            SysClockSource::PLL if !self.pll.is_configured() => {
                let preset = PllConfiguration::main_200mhz(self.config.hse_frequency_hz);
                log::debug!("main PLL not configured, using the 200MHz preset");
                self.enable_pll_source(preset.source)?;
                self.pll.configure(&preset)
            }
            SysClockSource::PLL if !self.pll.is_locked() => self.enable_pll(),
            SysClockSource::PLL => Ok(()),
        }
    }

    // Refuse a system clock the chip or the flash can't run at
    fn check_reachable(
        &self,
        sys_clock_hz: u32,
        ahb_prescaler: AHBPrescaler,
    ) -> Result<(), ClockError> {
        if sys_clock_hz > ChipSpecs::SYS_CLOCK_FREQUENCY_LIMIT_HZ {
            log::warn!("system clock at {}Hz is above the chip limit", sys_clock_hz);
            return Err(ClockError::Unreachable);
        }
        self.flash.get_number_wait_cycles_based_on_frequency(
            sys_clock_hz / u32::from(ahb_prescaler),
            self.config.supply_voltage_mv,
        )?;
        Ok(())
    }

    fn apply_worst_case_settings(&self) -> Result<(), ClockError> {
        self.flash.set_worst_case_latency()?;
        self.write_apb1_prescaler(APBPrescaler::from_divisor(ChipSpecs::safe_apb1_divisor()))?;
        self.write_apb2_prescaler(APBPrescaler::from_divisor(ChipSpecs::safe_apb2_divisor()))
    }

    /// Run the core from `source` with the AHB prescaler closest to `ahb_divisor` from above.
    ///
    /// The target frequency is checked before any register is written. When the frequency may
    /// rise, the flash latency is set to its maximum and the APB prescalers to safe values
    /// first. After the switch, the latency is lowered to what the new frequency needs and the
    /// APB prescalers found on entry are restored if they are still legal.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Unreachable]\): the system clock would exceed the chip limit.
    /// Nothing was written.
    /// + [Err]\([ClockError::NoWaitStates]\): the flash can't run at the new frequency. Nothing
    /// was written.
    /// + [Err]\([ClockError::InvalidPll]\): the default PLL preset doesn't fit the HSE frequency.
    /// + [Err]\([ClockError::Busy]\): the hardware didn't respond in time. The worst-case latency
    /// and safe APB prescalers stay in place.
    pub fn set_core_clock(
        &self,
        source: SysClockSource,
        ahb_divisor: u32,
    ) -> Result<CoreClockReport, ClockError> {
        let saved_apb1 = self.rcc.get_apb1_prescaler();
        let saved_apb2 = self.rcc.get_apb2_prescaler();
        let ahb_prescaler = AHBPrescaler::from_divisor(ahb_divisor);

        self.check_reachable(self.predict_sys_clock_frequency_hz(source), ahb_prescaler)?;

        let shrinks_ahb_divisor =
            u32::from(ahb_prescaler) < u32::from(self.rcc.get_ahb_prescaler());
        if self.rcc.get_sys_clock_source() == source {
            if shrinks_ahb_divisor {
                self.apply_worst_case_settings()?;
            }
            self.write_ahb_prescaler(ahb_prescaler)?;
        } else {
            self.apply_worst_case_settings()?;
            // Until the switch HCLK derives from the old source, only a larger divisor is safe
            if !shrinks_ahb_divisor {
                self.write_ahb_prescaler(ahb_prescaler)?;
            }
            self.start_source(source)?;
            self.select_sys_clock_source(source)?;
            if source == SysClockSource::PLL {
                support::dsb_isb();
            }
            if shrinks_ahb_divisor {
                self.write_ahb_prescaler(ahb_prescaler)?;
            }
        }

        let core_clock_hz = self.update_core_clock();
        let flash_latency = self
            .flash
            .configure_wait_states(core_clock_hz, self.config.supply_voltage_mv)?;

        let report = CoreClockReport {
            core_clock_hz,
            flash_latency,
            apb1: self.set_apb1_prescaler(saved_apb1.into()).into(),
            apb2: self.set_apb2_prescaler(saved_apb2.into()).into(),
        };

        log::debug!("core clock set: {:?}", report);
        Ok(report)
    }

    /// Run the core from the main PLL at `frequency_hz`, rounded down to a whole MHz and capped
    /// at the chip limit.
    ///
    /// The PLL is fed by HSE through a 1MHz input: M = HSE / 1MHz, N = 2 x MHz, P = 2.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Unreachable]\): HSE isn't a whole number of MHz or the frequency is
    /// too low for the VCO.
    /// + any error of [Clocks::configure_main_pll] or [Clocks::set_core_clock].
    pub fn set_core_clock_frequency(
        &self,
        frequency_hz: u32,
    ) -> Result<CoreClockReport, ClockError> {
        let frequency_hz = frequency_hz.min(ChipSpecs::SYS_CLOCK_FREQUENCY_LIMIT_HZ);
        let hse_frequency_hz = self.config.hse_frequency_hz;
        if hse_frequency_hz % 1_000_000 != 0 {
            return Err(ClockError::Unreachable);
        }

        let config = PllConfiguration {
            source: PllSource::HSE,
            m: hse_frequency_hz / 1_000_000,
            n: 2 * (frequency_hz / 1_000_000),
            p: 2,
            q: 2,
            r: 2,
        };
        config.validate().map_err(|parameter| {
            log::warn!("{}Hz unreachable: {:?} out of range", frequency_hz, parameter);
            ClockError::Unreachable
        })?;

        self.configure_main_pll(&config)?;
        self.set_core_clock(SysClockSource::PLL, 1)
    }

    /* Frequencies */

    /// System clock frequency, from the multiplexer status and the PLL factors.
    pub fn get_sysclk_frequency_hz(&self) -> u32 {
        match self.rcc.get_sys_clock_source() {
            SysClockSource::HSI => HSI_FREQUENCY_HZ,
            SysClockSource::HSE => self.config.hse_frequency_hz,
            SysClockSource::PLL => self
                .pll
                .get_configuration()
                .calculate_main_output(self.config.hse_frequency_hz),
        }
    }

    /// HCLK frequency, read from the hardware.
    pub fn get_core_frequency_hz(&self) -> u32 {
        self.get_sysclk_frequency_hz() / u32::from(self.rcc.get_ahb_prescaler())
    }

    pub fn get_ahb_frequency_hz(&self) -> u32 {
        self.get_core_frequency_hz()
    }

    pub fn get_apb1_frequency_hz(&self) -> u32 {
        self.get_core_frequency_hz() / u32::from(self.rcc.get_apb1_prescaler())
    }

    pub fn get_apb2_frequency_hz(&self) -> u32 {
        self.get_core_frequency_hz() / u32::from(self.rcc.get_apb2_prescaler())
    }

    /// Refresh the cached core clock frequency from the hardware and return it.
    pub fn update_core_clock(&self) -> u32 {
        let core_clock_hz = self.get_core_frequency_hz();
        self.core_clock_hz.set(core_clock_hz);
        core_clock_hz
    }

    /// Core clock frequency as of the last refresh.
    pub fn core_clock_hz(&self) -> u32 {
        self.core_clock_hz.get()
    }

    /* Prescalers */

    fn write_ahb_prescaler(&self, prescaler: AHBPrescaler) -> Result<(), ClockError> {
        self.rcc.set_ahb_prescaler(prescaler);
        wait_until(self.spin, || self.rcc.get_ahb_prescaler() == prescaler)
    }

    fn write_apb1_prescaler(&self, prescaler: APBPrescaler) -> Result<(), ClockError> {
        self.rcc.set_apb1_prescaler(prescaler);
        wait_until(self.spin, || self.rcc.get_apb1_prescaler() == prescaler)
    }

    fn write_apb2_prescaler(&self, prescaler: APBPrescaler) -> Result<(), ClockError> {
        self.rcc.set_apb2_prescaler(prescaler);
        wait_until(self.spin, || self.rcc.get_apb2_prescaler() == prescaler)
    }

    /// Change the AHB divisor, keeping the current source.
    ///
    /// Same as [Clocks::set_core_clock] with the current system clock source, so the flash
    /// latency and the APB prescalers follow.
    pub fn set_ahb_prescaler(&self, divisor: u32) -> Result<CoreClockReport, ClockError> {
        self.set_core_clock(self.rcc.get_sys_clock_source(), divisor)
    }

    pub fn get_ahb_prescaler(&self) -> AHBPrescaler {
        self.rcc.get_ahb_prescaler()
    }

    /// Set the APB1 prescaler to the smallest setting dividing by at least `divisor`.
    ///
    /// The ceiling is checked against the cached core clock frequency.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): the new prescaler wasn't read back in time.
    pub fn set_apb1_prescaler(&self, divisor: u32) -> Result<PrescalerUpdate, ClockError> {
        let prescaler = APBPrescaler::from_divisor(divisor);
        if self.core_clock_hz() / u32::from(prescaler) > ChipSpecs::APB1_FREQUENCY_LIMIT_HZ {
            log::warn!("APB1 {:?} skipped at {}Hz", prescaler, self.core_clock_hz());
            return Ok(PrescalerUpdate::SkippedAboveCeiling);
        }

        self.write_apb1_prescaler(prescaler)?;
        Ok(PrescalerUpdate::Applied)
    }

    pub fn get_apb1_prescaler(&self) -> APBPrescaler {
        self.rcc.get_apb1_prescaler()
    }

    /// Set the APB2 prescaler to the smallest setting dividing by at least `divisor`.
    ///
    /// The ceiling is checked against the cached core clock frequency.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): the new prescaler wasn't read back in time.
    pub fn set_apb2_prescaler(&self, divisor: u32) -> Result<PrescalerUpdate, ClockError> {
        let prescaler = APBPrescaler::from_divisor(divisor);
        if self.core_clock_hz() / u32::from(prescaler) > ChipSpecs::APB2_FREQUENCY_LIMIT_HZ {
            log::warn!("APB2 {:?} skipped at {}Hz", prescaler, self.core_clock_hz());
            return Ok(PrescalerUpdate::SkippedAboveCeiling);
        }

        self.write_apb2_prescaler(prescaler)?;
        Ok(PrescalerUpdate::Applied)
    }

    pub fn get_apb2_prescaler(&self) -> APBPrescaler {
        self.rcc.get_apb2_prescaler()
    }
}
