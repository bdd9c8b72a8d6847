// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Reset and clock control (RCC) registers of the STM32F7 family.
//!
//! Only the clock tree registers are described. Every setter performs a read-modify-write of
//! the fields it owns and leaves the other bits of the register untouched.

use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::clocks::divisor;

register_structs! {
    /// Reset and clock control
    pub(crate) RccRegisters {
        /// clock control register
        (0x000 => pub(crate) cr: ReadWrite<u32, CR::Register>),
        /// PLL configuration register
        (0x004 => pub(crate) pllcfgr: ReadWrite<u32, PLLCFGR::Register>),
        /// clock configuration register
        (0x008 => pub(crate) cfgr: ReadWrite<u32, CFGR::Register>),
        /// clock interrupt register
        (0x00C => pub(crate) cir: ReadWrite<u32>),
        /// peripheral reset, enable, backup domain and spread spectrum registers
        (0x010 => _reserved0),
        /// PLLI2S configuration register
        (0x084 => pub(crate) plli2scfgr: ReadWrite<u32, PLLI2SCFGR::Register>),
        /// PLLSAI configuration register
        (0x088 => pub(crate) pllsaicfgr: ReadWrite<u32, PLLSAICFGR::Register>),
        /// dedicated clocks configuration registers
        (0x08C => _reserved1),
        (0x094 => @END),
    }
}

register_bitfields![u32,
    pub(crate) CR [
        /// PLLSAI clock ready flag
        PLLSAIRDY OFFSET(29) NUMBITS(1) [],
        /// PLLSAI enable
        PLLSAION OFFSET(28) NUMBITS(1) [],
        /// PLLI2S clock ready flag
        PLLI2SRDY OFFSET(27) NUMBITS(1) [],
        /// PLLI2S enable
        PLLI2SON OFFSET(26) NUMBITS(1) [],
        /// Main PLL (PLL) clock ready flag
        PLLRDY OFFSET(25) NUMBITS(1) [],
        /// Main PLL (PLL) enable
        PLLON OFFSET(24) NUMBITS(1) [],
        /// Clock security system enable
        CSSON OFFSET(19) NUMBITS(1) [],
        /// HSE clock bypass
        HSEBYP OFFSET(18) NUMBITS(1) [],
        /// HSE clock ready flag
        HSERDY OFFSET(17) NUMBITS(1) [],
        /// HSE clock enable
        HSEON OFFSET(16) NUMBITS(1) [],
        /// Internal high-speed clock calibration
        HSICAL OFFSET(8) NUMBITS(8) [],
        /// Internal high-speed clock trimming
        HSITRIM OFFSET(3) NUMBITS(5) [],
        /// Internal high-speed clock ready flag
        HSIRDY OFFSET(1) NUMBITS(1) [],
        /// Internal high-speed clock enable
        HSION OFFSET(0) NUMBITS(1) []
    ],
    pub(crate) PLLCFGR [
        /// Main PLL division factor for DSI clock (STM32F76x only)
        PLLR OFFSET(28) NUMBITS(3) [],
        /// Main PLL (PLL) division factor for USB OTG FS, SDMMC and random number generator
        PLLQ OFFSET(24) NUMBITS(4) [],
        /// Main PLL(PLL) and audio PLL (PLLI2S) entry clock source
        PLLSRC OFFSET(22) NUMBITS(1) [],
        /// Main PLL (PLL) division factor for main system clock
        PLLP OFFSET(16) NUMBITS(2) [],
        /// Main PLL (PLL) multiplication factor for VCO
        PLLN OFFSET(6) NUMBITS(9) [],
        /// Division factor for the main PLL (PLL) and audio PLL (PLLI2S) input clock
        PLLM OFFSET(0) NUMBITS(6) []
    ],
    pub(crate) CFGR [
        /// Microcontroller clock output 2
        MCO2 OFFSET(30) NUMBITS(2) [],
        /// MCO2 prescaler
        MCO2PRE OFFSET(27) NUMBITS(3) [],
        /// MCO1 prescaler
        MCO1PRE OFFSET(24) NUMBITS(3) [],
        /// I2S clock selection
        I2SSRC OFFSET(23) NUMBITS(1) [],
        /// Microcontroller clock output 1
        MCO1 OFFSET(21) NUMBITS(2) [],
        /// HSE division factor for RTC clock
        RTCPRE OFFSET(16) NUMBITS(5) [],
        /// APB high-speed prescaler (APB2)
        PPRE2 OFFSET(13) NUMBITS(3) [],
        /// APB Low speed prescaler (APB1)
        PPRE1 OFFSET(10) NUMBITS(3) [],
        /// AHB prescaler
        HPRE OFFSET(4) NUMBITS(4) [],
        /// System clock switch status
        SWS OFFSET(2) NUMBITS(2) [],
        /// System clock switch
        SW OFFSET(0) NUMBITS(2) []
    ],
    pub(crate) PLLI2SCFGR [
        /// PLLI2S division factor for I2S clocks
        PLLI2SR OFFSET(28) NUMBITS(3) [],
        /// PLLI2S division factor for SAI1 clock
        PLLI2SQ OFFSET(24) NUMBITS(4) [],
        /// PLLI2S division factor for SPDIF-Rx clock
        PLLI2SP OFFSET(16) NUMBITS(2) [],
        /// PLLI2S multiplication factor for VCO
        PLLI2SN OFFSET(6) NUMBITS(9) []
    ],
    pub(crate) PLLSAICFGR [
        /// PLLSAI division factor for LCD clock
        PLLSAIR OFFSET(28) NUMBITS(3) [],
        /// PLLSAI division factor for SAI clock
        PLLSAIQ OFFSET(24) NUMBITS(4) [],
        /// PLLSAI division factor for 48MHz clock
        PLLSAIP OFFSET(16) NUMBITS(2) [],
        /// PLLSAI multiplication factor for VCO
        PLLSAIN OFFSET(6) NUMBITS(9) []
    ]
];

const RCC_BASE: *const RccRegisters = 0x4002_3800 as *const RccRegisters;

/// Main PLL output divider for the system clock
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PLLP {
    DivideBy2 = 0b00,
    DivideBy4 = 0b01,
    DivideBy6 = 0b10,
    DivideBy8 = 0b11,
}

impl PLLP {
    fn from_encoding(encoding: u32) -> Self {
        match encoding & 0b11 {
            0b00 => PLLP::DivideBy2,
            0b01 => PLLP::DivideBy4,
            0b10 => PLLP::DivideBy6,
            _ => PLLP::DivideBy8,
        }
    }
}

impl TryFrom<u32> for PLLP {
    type Error = ();

    fn try_from(divider: u32) -> Result<Self, Self::Error> {
        match divider {
            2 => Ok(PLLP::DivideBy2),
            4 => Ok(PLLP::DivideBy4),
            6 => Ok(PLLP::DivideBy6),
            8 => Ok(PLLP::DivideBy8),
            _ => Err(()),
        }
    }
}

impl From<PLLP> for u32 {
    fn from(item: PLLP) -> Self {
        match item {
            PLLP::DivideBy2 => 2,
            PLLP::DivideBy4 => 4,
            PLLP::DivideBy6 => 6,
            PLLP::DivideBy8 => 8,
        }
    }
}

/// Clock driving the system clock multiplexer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SysClockSource {
    HSI = 0b00,
    HSE = 0b01,
    PLL = 0b10,
}

/// Entry clock of the main and auxiliary PLLs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PllSource {
    HSI = 0b0,
    HSE = 0b1,
}

/// How the HSE pin is driven
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HseMode {
    /// An external oscillator drives OSC_IN directly
    BYPASS,
    /// A crystal or ceramic resonator sits between OSC_IN and OSC_OUT
    CRYSTAL,
}

/// AHB prescaler. There is no divide-by-32 setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AHBPrescaler {
    DivideBy1 = 0b0000,
    DivideBy2 = 0b1000,
    DivideBy4 = 0b1001,
    DivideBy8 = 0b1010,
    DivideBy16 = 0b1011,
    DivideBy64 = 0b1100,
    DivideBy128 = 0b1101,
    DivideBy256 = 0b1110,
    DivideBy512 = 0b1111,
}

impl AHBPrescaler {
    /// Decode a 4-bit HPRE value. Every 0b0xxx value means no division.
    pub fn from_encoding(encoding: u32) -> Self {
        match encoding & 0b1111 {
            0b1000 => AHBPrescaler::DivideBy2,
            0b1001 => AHBPrescaler::DivideBy4,
            0b1010 => AHBPrescaler::DivideBy8,
            0b1011 => AHBPrescaler::DivideBy16,
            0b1100 => AHBPrescaler::DivideBy64,
            0b1101 => AHBPrescaler::DivideBy128,
            0b1110 => AHBPrescaler::DivideBy256,
            0b1111 => AHBPrescaler::DivideBy512,
            _ => AHBPrescaler::DivideBy1,
        }
    }

    /// The smallest prescaler dividing by at least `divisor`.
    pub fn from_divisor(divisor: u32) -> Self {
        Self::from_encoding(divisor::find_ahb_prescaler_encoding(divisor))
    }

    pub fn encoding(self) -> u32 {
        self as u32
    }
}

impl From<AHBPrescaler> for u32 {
    fn from(item: AHBPrescaler) -> Self {
        divisor::ahb_divisor(item.encoding())
    }
}

/// APB1 and APB2 prescalers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum APBPrescaler {
    DivideBy1 = 0b000,
    DivideBy2 = 0b100,
    DivideBy4 = 0b101,
    DivideBy8 = 0b110,
    DivideBy16 = 0b111,
}

impl APBPrescaler {
    /// Decode a 3-bit PPREx value. Every 0b0xx value means no division.
    pub fn from_encoding(encoding: u32) -> Self {
        match encoding & 0b111 {
            0b100 => APBPrescaler::DivideBy2,
            0b101 => APBPrescaler::DivideBy4,
            0b110 => APBPrescaler::DivideBy8,
            0b111 => APBPrescaler::DivideBy16,
            _ => APBPrescaler::DivideBy1,
        }
    }

    /// The smallest prescaler dividing by at least `divisor`, capped at 16.
    pub fn from_divisor(divisor: u32) -> Self {
        Self::from_encoding(divisor::find_apb_prescaler_encoding(divisor))
    }

    pub fn encoding(self) -> u32 {
        self as u32
    }
}

impl From<APBPrescaler> for u32 {
    fn from(item: APBPrescaler) -> Self {
        divisor::apb_divisor(item.encoding())
    }
}

/// Factors of an auxiliary PLL as stored in its configuration register
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AuxiliaryPllFactors {
    pub(crate) n: u32,
    pub(crate) p: PLLP,
    pub(crate) q: u32,
    pub(crate) r: u32,
}

pub struct Rcc<'a> {
    registers: &'a RccRegisters,
}

impl Rcc<'static> {
    pub fn new() -> Self {
        Self {
            // The RCC block is always mapped at RCC_BASE and all accesses go through
            // volatile cells.
            registers: unsafe { &*RCC_BASE },
        }
    }
}

impl<'a> Rcc<'a> {
    #[cfg(test)]
    pub(crate) fn with_registers(registers: &'a RccRegisters) -> Self {
        Self { registers }
    }

    // Clock interrupts are not used by the drivers
    pub(crate) fn disable_clock_interrupts(&self) {
        self.registers.cir.set(0);
    }

    /* System clock multiplexer */

    // Get the current system clock source
    pub(crate) fn get_sys_clock_source(&self) -> SysClockSource {
        match self.registers.cfgr.read(CFGR::SWS) {
            0b00 => SysClockSource::HSI,
            0b01 => SysClockSource::HSE,
            _ => SysClockSource::PLL,
        }
    }

    // Request a new system clock source. The switch only happens once the source is ready and
    // is acknowledged through SWS.
    pub(crate) fn set_sys_clock_source(&self, source: SysClockSource) {
        self.registers.cfgr.modify(CFGR::SW.val(source as u32));
    }

    /* HSI clock */

    // The HSI clock must not be configured as the system clock.
    pub(crate) fn disable_hsi_clock(&self) {
        self.registers.cr.modify(CR::HSION::CLEAR);
    }

    pub(crate) fn enable_hsi_clock(&self) {
        self.registers.cr.modify(CR::HSION::SET);
    }

    pub(crate) fn is_enabled_hsi_clock(&self) -> bool {
        self.registers.cr.is_set(CR::HSION)
    }

    // Indicates whether the HSI oscillator is stable
    pub(crate) fn is_ready_hsi_clock(&self) -> bool {
        self.registers.cr.is_set(CR::HSIRDY)
    }

    /* HSE clock */

    pub(crate) fn disable_hse_clock(&self) {
        self.registers.cr.modify(CR::HSEON::CLEAR);
        self.registers.cr.modify(CR::HSEBYP::CLEAR);
    }

    // HSEBYP can only be written while HSEON is cleared
    pub(crate) fn set_hse_clock_bypass(&self, bypass: bool) {
        if bypass {
            self.registers.cr.modify(CR::HSEBYP::SET);
        } else {
            self.registers.cr.modify(CR::HSEBYP::CLEAR);
        }
    }

    pub(crate) fn enable_hse_clock(&self) {
        self.registers.cr.modify(CR::HSEON::SET);
    }

    pub(crate) fn is_enabled_hse_clock(&self) -> bool {
        self.registers.cr.is_set(CR::HSEON)
    }

    // Indicates whether the HSE oscillator is stable
    pub(crate) fn is_ready_hse_clock(&self) -> bool {
        self.registers.cr.is_set(CR::HSERDY)
    }

    /* Main PLL clock */

    // The main PLL clock must not be configured as the system clock.
    pub(crate) fn disable_pll_clock(&self) {
        self.registers.cr.modify(CR::PLLON::CLEAR);
    }

    pub(crate) fn enable_pll_clock(&self) {
        self.registers.cr.modify(CR::PLLON::SET);
    }

    pub(crate) fn is_enabled_pll_clock(&self) -> bool {
        self.registers.cr.is_set(CR::PLLON)
    }

    // The PLL clock is locked when its signal is stable
    pub(crate) fn is_locked_pll_clock(&self) -> bool {
        self.registers.cr.is_set(CR::PLLRDY)
    }

    pub(crate) fn get_pll_clocks_source(&self) -> PllSource {
        match self.registers.pllcfgr.read(PLLCFGR::PLLSRC) {
            0b0 => PllSource::HSI,
            _ => PllSource::HSE,
        }
    }

    pub(crate) fn get_pll_clocks_m_divider(&self) -> u32 {
        self.registers.pllcfgr.read(PLLCFGR::PLLM)
    }

    pub(crate) fn get_pll_clock_n_multiplier(&self) -> u32 {
        self.registers.pllcfgr.read(PLLCFGR::PLLN)
    }

    pub(crate) fn get_pll_clock_p_divider(&self) -> PLLP {
        PLLP::from_encoding(self.registers.pllcfgr.read(PLLCFGR::PLLP))
    }

    pub(crate) fn get_pll_clock_q_divider(&self) -> u32 {
        self.registers.pllcfgr.read(PLLCFGR::PLLQ)
    }

    // Reserved on the STM32F74x, reads back the reset value
    pub(crate) fn get_pll_clock_r_divider(&self) -> u32 {
        self.registers.pllcfgr.read(PLLCFGR::PLLR)
    }

    // This method must be called only when all PLL clocks are disabled, since the source and
    // the M divider are shared with PLLI2S and PLLSAI.
    pub(crate) fn set_pll_clocks_factors(
        &self,
        source: PllSource,
        m: u32,
        n: u32,
        p: PLLP,
        q: u32,
    ) {
        self.registers.pllcfgr.modify(
            PLLCFGR::PLLSRC.val(source as u32)
                + PLLCFGR::PLLM.val(m)
                + PLLCFGR::PLLN.val(n)
                + PLLCFGR::PLLP.val(p as u32)
                + PLLCFGR::PLLQ.val(q),
        );
    }

    /* PLLSAI clock */

    pub(crate) fn disable_pllsai_clock(&self) {
        self.registers.cr.modify(CR::PLLSAION::CLEAR);
    }

    pub(crate) fn enable_pllsai_clock(&self) {
        self.registers.cr.modify(CR::PLLSAION::SET);
    }

    pub(crate) fn is_locked_pllsai_clock(&self) -> bool {
        self.registers.cr.is_set(CR::PLLSAIRDY)
    }

    pub(crate) fn get_pllsai_factors(&self) -> AuxiliaryPllFactors {
        let pllsaicfgr = self.registers.pllsaicfgr.extract();
        AuxiliaryPllFactors {
            n: pllsaicfgr.read(PLLSAICFGR::PLLSAIN),
            p: PLLP::from_encoding(pllsaicfgr.read(PLLSAICFGR::PLLSAIP)),
            q: pllsaicfgr.read(PLLSAICFGR::PLLSAIQ),
            r: pllsaicfgr.read(PLLSAICFGR::PLLSAIR),
        }
    }

    // This method must be called only if PLLSAI is disabled
    pub(crate) fn set_pllsai_factors(&self, factors: AuxiliaryPllFactors) {
        self.registers.pllsaicfgr.modify(
            PLLSAICFGR::PLLSAIN.val(factors.n)
                + PLLSAICFGR::PLLSAIP.val(factors.p as u32)
                + PLLSAICFGR::PLLSAIQ.val(factors.q)
                + PLLSAICFGR::PLLSAIR.val(factors.r),
        );
    }

    /* PLLI2S clock */

    pub(crate) fn disable_plli2s_clock(&self) {
        self.registers.cr.modify(CR::PLLI2SON::CLEAR);
    }

    pub(crate) fn enable_plli2s_clock(&self) {
        self.registers.cr.modify(CR::PLLI2SON::SET);
    }

    pub(crate) fn is_locked_plli2s_clock(&self) -> bool {
        self.registers.cr.is_set(CR::PLLI2SRDY)
    }

    pub(crate) fn get_plli2s_factors(&self) -> AuxiliaryPllFactors {
        let plli2scfgr = self.registers.plli2scfgr.extract();
        AuxiliaryPllFactors {
            n: plli2scfgr.read(PLLI2SCFGR::PLLI2SN),
            p: PLLP::from_encoding(plli2scfgr.read(PLLI2SCFGR::PLLI2SP)),
            q: plli2scfgr.read(PLLI2SCFGR::PLLI2SQ),
            r: plli2scfgr.read(PLLI2SCFGR::PLLI2SR),
        }
    }

    // This method must be called only if PLLI2S is disabled
    pub(crate) fn set_plli2s_factors(&self, factors: AuxiliaryPllFactors) {
        self.registers.plli2scfgr.modify(
            PLLI2SCFGR::PLLI2SN.val(factors.n)
                + PLLI2SCFGR::PLLI2SP.val(factors.p as u32)
                + PLLI2SCFGR::PLLI2SQ.val(factors.q)
                + PLLI2SCFGR::PLLI2SR.val(factors.r),
        );
    }

    /* AHB prescaler */

    pub(crate) fn set_ahb_prescaler(&self, ahb_prescaler: AHBPrescaler) {
        self.registers
            .cfgr
            .modify(CFGR::HPRE.val(ahb_prescaler.encoding()));
    }

    pub(crate) fn get_ahb_prescaler(&self) -> AHBPrescaler {
        AHBPrescaler::from_encoding(self.registers.cfgr.read(CFGR::HPRE))
    }

    /* APB1 prescaler */

    pub(crate) fn set_apb1_prescaler(&self, apb1_prescaler: APBPrescaler) {
        self.registers
            .cfgr
            .modify(CFGR::PPRE1.val(apb1_prescaler.encoding()));
    }

    pub(crate) fn get_apb1_prescaler(&self) -> APBPrescaler {
        APBPrescaler::from_encoding(self.registers.cfgr.read(CFGR::PPRE1))
    }

    /* APB2 prescaler */

    pub(crate) fn set_apb2_prescaler(&self, apb2_prescaler: APBPrescaler) {
        self.registers
            .cfgr
            .modify(CFGR::PPRE2.val(apb2_prescaler.encoding()));
    }

    pub(crate) fn get_apb2_prescaler(&self) -> APBPrescaler {
        APBPrescaler::from_encoding(self.registers.cfgr.read(CFGR::PPRE2))
    }
}
