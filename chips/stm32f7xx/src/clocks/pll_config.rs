// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! PLL factors and the frequencies they produce.
//!
//! All three PLLs of the STM32F7 share the same structure:
//!
//! ```text
//!                    +-----+     +-----+     +-----+
//! HSI/HSE --> /M --> | VCO | x N |     | --> | /P  | --> P output
//!                    +-----+     |     | --> | /Q  | --> Q output
//!                                |     | --> | /R  | --> R output
//!                                +-----+     +-----+
//! ```
//!
//! The source and the M divider belong to the main PLL and are shared by PLLSAI and PLLI2S.
//!
//! [PllConfiguration] is a plain value: building or validating one never touches the hardware.

use crate::clocks::hsi::HSI_FREQUENCY_HZ;
use crate::rcc::PllSource;

/// PLL factor reported by [PllConfiguration::validate]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllParameter {
    M,
    N,
    P,
    Q,
    R,
}

/// Programming of one PLL unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PllConfiguration {
    /// Entry clock. Ignored for the auxiliary PLLs.
    pub source: PllSource,
    /// Input divider, 2..=63. Ignored for the auxiliary PLLs.
    pub m: u32,
    /// VCO multiplier, 50..=432
    pub n: u32,
    /// P output divider, one of 2, 4, 6 or 8
    pub p: u32,
    /// Q output divider, 2..=15
    pub q: u32,
    /// R output divider, 2..=7. 0 when the R output is unused.
    pub r: u32,
}

/// Every frequency produced by a [PllConfiguration], in Hz.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PllOutputFrequencies {
    /// Frequency of the entry clock
    pub input_hz: u32,
    /// VCO input, after the M divider
    pub pll_input_hz: u32,
    /// VCO output
    pub vco_hz: u32,
    /// P output, 0 if P is 0
    pub p_hz: u32,
    /// Q output, 0 if Q is 0
    pub q_hz: u32,
    /// R output, 0 if R is 0
    pub r_hz: u32,
}

/// Frequencies above `u32::MAX` only come from illegal factors
fn saturate(frequency: u64) -> u32 {
    u32::try_from(frequency).unwrap_or(u32::MAX)
}

fn divide(frequency: u64, divider: u32) -> u64 {
    if divider == 0 {
        0
    } else {
        frequency / divider as u64
    }
}

impl PllConfiguration {
    /// 200MHz system clock from HSE, with a 1MHz VCO input.
    pub const fn main_200mhz(hse_frequency_hz: u32) -> Self {
        Self {
            source: PllSource::HSE,
            m: hse_frequency_hz / 1_000_000,
            n: 400,
            p: 2,
            q: 2,
            r: 2,
        }
    }

    /// 216MHz system clock from HSE, with a 1MHz VCO input.
    pub const fn main_216mhz(hse_frequency_hz: u32) -> Self {
        Self {
            source: PllSource::HSE,
            m: hse_frequency_hz / 1_000_000,
            n: 432,
            p: 2,
            q: 2,
            r: 2,
        }
    }

    /// Highest system clock the chip supports.
    pub const fn main_max(hse_frequency_hz: u32) -> Self {
        Self::main_216mhz(hse_frequency_hz)
    }

    /// PLLSAI with 48MHz P and Q outputs and a 72MHz R output, from a 288MHz VCO.
    pub const fn sai_48mhz(hse_frequency_hz: u32) -> Self {
        Self {
            source: PllSource::HSE,
            m: hse_frequency_hz / 1_000_000,
            n: 288,
            p: 6,
            q: 6,
            r: 4,
        }
    }

    /// Frequency of the entry clock selected by `source`.
    pub fn input_frequency_hz(&self, hse_frequency_hz: u32) -> u32 {
        match self.source {
            PllSource::HSI => HSI_FREQUENCY_HZ,
            PllSource::HSE => hse_frequency_hz,
        }
    }

    /// Frequency of the P output, which feeds the system clock multiplexer.
    ///
    /// The product `input * N` is computed on 64 bits before any division.
    pub fn calculate_main_output(&self, hse_frequency_hz: u32) -> u32 {
        let input = self.input_frequency_hz(hse_frequency_hz) as u64;
        let vco = divide(input * self.n as u64, self.m);
        saturate(divide(vco, self.p))
    }

    /// All the frequencies along the PLL.
    pub fn calculate_all_outputs(&self, hse_frequency_hz: u32) -> PllOutputFrequencies {
        let input = self.input_frequency_hz(hse_frequency_hz) as u64;
        let vco = divide(input * self.n as u64, self.m);

        PllOutputFrequencies {
            input_hz: saturate(input),
            pll_input_hz: saturate(divide(input, self.m)),
            vco_hz: saturate(vco),
            p_hz: saturate(divide(vco, self.p)),
            q_hz: saturate(divide(vco, self.q)),
            r_hz: saturate(divide(vco, self.r)),
        }
    }

    /// Check every factor against its legal range.
    ///
    /// # Errors
    ///
    /// + [Err]\([PllParameter]\): the first factor, in M, N, P, Q, R order, that is out of range
    pub fn validate(&self) -> Result<(), PllParameter> {
        if self.m < 2 || self.m > 63 {
            return Err(PllParameter::M);
        }
        self.validate_auxiliary()
    }

    /// Same as [PllConfiguration::validate] without M, which auxiliary PLLs take from the main
    /// PLL.
    pub fn validate_auxiliary(&self) -> Result<(), PllParameter> {
        if self.n < 50 || self.n > 432 {
            return Err(PllParameter::N);
        }
        if !matches!(self.p, 2 | 4 | 6 | 8) {
            return Err(PllParameter::P);
        }
        if self.q < 2 || self.q > 15 {
            return Err(PllParameter::Q);
        }
        if self.r != 0 && (self.r < 2 || self.r > 7) {
            return Err(PllParameter::R);
        }
        Ok(())
    }
}
