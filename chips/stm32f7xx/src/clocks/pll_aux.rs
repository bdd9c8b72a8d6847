// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! PLLSAI and PLLI2S clock drivers. [^doc_ref]
//!
//! Both auxiliary PLLs take their entry clock and M divider from the main PLL. Only N, P, Q and
//! R are programmed here.
//!
//! [^doc_ref]: See 5.3.3 and 5.3.23 in RM0385.

use crate::clocks::pll_config::{PllConfiguration, PllParameter};
use crate::errorcode::ClockError;
use crate::rcc::{AuxiliaryPllFactors, Rcc, PLLP};
use crate::spin::{wait_until, Spin};

/// Auxiliary PLL selector
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuxiliaryPllUnit {
    /// PLLSAI: SAI, LCD-TFT and 48MHz clocks
    Sai,
    /// PLLI2S: I2S, SAI and SPDIF-Rx clocks
    I2s,
}

pub struct AuxiliaryPll<'a> {
    unit: AuxiliaryPllUnit,
    rcc: &'a Rcc<'a>,
    spin: &'a dyn Spin,
}

impl<'a> AuxiliaryPll<'a> {
    pub(in crate::clocks) fn new(
        unit: AuxiliaryPllUnit,
        rcc: &'a Rcc<'a>,
        spin: &'a dyn Spin,
    ) -> Self {
        Self { unit, rcc, spin }
    }

    pub fn unit(&self) -> AuxiliaryPllUnit {
        self.unit
    }

    /// Program N, P, Q and R and start the PLL. `source` and `m` of `config` are ignored.
    ///
    /// The caller must make sure the main PLL has been configured, since the shared M divider
    /// comes from it.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InvalidPll]\): a factor is out of range. Nothing was written.
    /// + [Err]\([ClockError::Busy]\): the PLL didn't unlock or lock in time.
    pub(in crate::clocks) fn configure(&self, config: &PllConfiguration) -> Result<(), ClockError> {
        config.validate_auxiliary()?;
        let factors = AuxiliaryPllFactors {
            n: config.n,
            p: PLLP::try_from(config.p).map_err(|()| PllParameter::P)?,
            q: config.q,
            r: config.r,
        };

        self.disable()?;

        match self.unit {
            AuxiliaryPllUnit::Sai => self.rcc.set_pllsai_factors(factors),
            AuxiliaryPllUnit::I2s => self.rcc.set_plli2s_factors(factors),
        }

        self.enable()?;
        log::debug!("{:?} PLL configured: {:?}", self.unit, config);
        Ok(())
    }

    /// Start the PLL and wait for lock.
    pub fn enable(&self) -> Result<(), ClockError> {
        match self.unit {
            AuxiliaryPllUnit::Sai => self.rcc.enable_pllsai_clock(),
            AuxiliaryPllUnit::I2s => self.rcc.enable_plli2s_clock(),
        }

        wait_until(self.spin, || self.is_locked()).inspect_err(|_| {
            log::error!("{:?} PLL didn't lock", self.unit);
        })
    }

    /// Stop the PLL and wait until it unlocks.
    pub fn disable(&self) -> Result<(), ClockError> {
        match self.unit {
            AuxiliaryPllUnit::Sai => self.rcc.disable_pllsai_clock(),
            AuxiliaryPllUnit::I2s => self.rcc.disable_plli2s_clock(),
        }

        wait_until(self.spin, || !self.is_locked()).inspect_err(|_| {
            log::error!("{:?} PLL didn't unlock", self.unit);
        })
    }

    pub fn is_locked(&self) -> bool {
        match self.unit {
            AuxiliaryPllUnit::Sai => self.rcc.is_locked_pllsai_clock(),
            AuxiliaryPllUnit::I2s => self.rcc.is_locked_plli2s_clock(),
        }
    }

    /// Factors currently programmed, with the source and M shared from the main PLL.
    pub fn get_configuration(&self) -> PllConfiguration {
        let factors = match self.unit {
            AuxiliaryPllUnit::Sai => self.rcc.get_pllsai_factors(),
            AuxiliaryPllUnit::I2s => self.rcc.get_plli2s_factors(),
        };

        PllConfiguration {
            source: self.rcc.get_pll_clocks_source(),
            m: self.rcc.get_pll_clocks_m_divider(),
            n: factors.n,
            p: factors.p.into(),
            q: factors.q,
            r: factors.r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_chip::{VirtualChip, AUXILIARY_PLLCFGR_RESET_VALUE};
    use tock_registers::interfaces::Readable;

    const HSE_FREQUENCY_HZ: u32 = 25_000_000;

    #[test]
    fn sai_configuration_reads_back() {
        let chip = VirtualChip::new();
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let pllsai = AuxiliaryPll::new(AuxiliaryPllUnit::Sai, &rcc, &chip);
        let preset = PllConfiguration::sai_48mhz(HSE_FREQUENCY_HZ);

        assert_eq!(Ok(()), pllsai.configure(&preset));
        assert!(pllsai.is_locked());

        let config = pllsai.get_configuration();
        assert_eq!((288, 6, 6, 4), (config.n, config.p, config.q, config.r));
        // Shared fields come from the main PLL, still at reset
        assert_eq!(16, config.m);
        assert_eq!(
            AUXILIARY_PLLCFGR_RESET_VALUE,
            chip.rcc_registers().plli2scfgr.get()
        );
    }

    #[test]
    fn i2s_ignores_m() {
        let chip = VirtualChip::new();
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let plli2s = AuxiliaryPll::new(AuxiliaryPllUnit::I2s, &rcc, &chip);
        let config = PllConfiguration {
            m: 0,
            n: 192,
            p: 2,
            q: 4,
            r: 5,
            ..PllConfiguration::sai_48mhz(HSE_FREQUENCY_HZ)
        };

        assert_eq!(Ok(()), plli2s.configure(&config));
        assert_eq!(5, plli2s.get_configuration().r);
        assert_eq!(AuxiliaryPllUnit::I2s, plli2s.unit());
    }

    #[test]
    fn invalid_factor_writes_nothing() {
        let chip = VirtualChip::new();
        let rcc = Rcc::with_registers(chip.rcc_registers());
        let pllsai = AuxiliaryPll::new(AuxiliaryPllUnit::Sai, &rcc, &chip);
        let config = PllConfiguration {
            q: 16,
            ..PllConfiguration::sai_48mhz(HSE_FREQUENCY_HZ)
        };

        assert_eq!(
            Err(ClockError::InvalidPll(PllParameter::Q)),
            pllsai.configure(&config)
        );
        assert_eq!(
            AUXILIARY_PLLCFGR_RESET_VALUE,
            chip.rcc_registers().pllsaicfgr.get()
        );
        assert!(!pllsai.is_locked());
    }
}
