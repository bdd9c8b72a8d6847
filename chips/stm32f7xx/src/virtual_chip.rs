// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! In-memory RCC and FLASH blocks for host tests.
//!
//! The registers live in leaked heap memory laid out like the hardware blocks. Between two polls
//! of a status flag, [VirtualChip] plays the part of the hardware: enable bits propagate to
//! their ready flags, the multiplexer follows SW once the selected source is ready, and a
//! [Snapshot] of the clock tree is appended to the trace.

use core::cell::{Cell, RefCell};
use std::boxed::Box;
use std::vec::Vec;

use tock_registers::interfaces::{Readable, Writeable};

use crate::chip_specific::clock_constants::SystemClockConstants;
use crate::chip_specific::flash::FlashChipSpecific;
use crate::clocks::divisor;
use crate::clocks::hsi::HSI_FREQUENCY_HZ;
use crate::clocks::pll_config::PllConfiguration;
use crate::flash::{FlashLatency, FlashRegisters, WaitStateRow, ACR};
use crate::rcc::{PllSource, RccRegisters, CFGR, CR, PLLCFGR};
use crate::spin::Spin;

/// Board oscillator assumed by the emulator
pub(crate) const HSE_FREQUENCY_HZ: u32 = 25_000_000;

/// Polls before a flag is reported as stuck
const POLL_LIMIT: usize = 64;

/// HSION | HSIRDY | HSITRIM = 16
const CR_RESET_VALUE: u32 = 0x0000_0083;
/// RCC_PLLCFGR: M = 16, N = 192, P = 2, Q = 4, HSI source
const PLLCFGR_RESET_VALUE: u32 = 0x2400_3010;
/// RCC_PLLI2SCFGR and RCC_PLLSAICFGR: N = 192, P = 2, Q = 4, R = 2
pub(crate) const AUXILIARY_PLLCFGR_RESET_VALUE: u32 = 0x2400_3000;

// Copy of `stm32f746::chip_specs::WAIT_STATE_TABLE`, which this crate can't depend on. Keep the
// two in sync.
pub(crate) const F74X_WAIT_STATES: [WaitStateRow; 5] = [
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
    WaitStateRow {
        min_voltage_mv: 1800,
        max_frequency_mhz: [20, 40, 60, 80, 100, 120, 140, 160, 180, 0, 0],
    },
    WaitStateRow::END,
];

pub(crate) enum TestSpecs {}

impl SystemClockConstants for TestSpecs {}

impl FlashChipSpecific for TestSpecs {
    const WAIT_STATE_TABLE: &'static [WaitStateRow] = &F74X_WAIT_STATES;
    const MAX_WAIT_STATES: FlashLatency = FlashLatency::Latency9;
}

/// Clock tree state observed at one poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Snapshot {
    /// SWS field
    pub(crate) sws: u32,
    pub(crate) pll_on: bool,
    pub(crate) pll_ready: bool,
    pub(crate) ahb_divisor: u32,
    pub(crate) apb1_divisor: u32,
    pub(crate) apb2_divisor: u32,
    pub(crate) latency: usize,
    pub(crate) sysclk_hz: u32,
    pub(crate) hclk_hz: u32,
}

impl Snapshot {
    pub(crate) fn apb1_hz(&self) -> u32 {
        self.hclk_hz / self.apb1_divisor
    }

    pub(crate) fn apb2_hz(&self) -> u32 {
        self.hclk_hz / self.apb2_divisor
    }
}

pub(crate) struct VirtualChip {
    rcc: &'static RccRegisters,
    flash: &'static FlashRegisters,
    // Ready flags that never assert
    stuck: Cell<u32>,
    trace: RefCell<Vec<Snapshot>>,
}

fn leak_block<T>(words: usize) -> &'static T {
    let memory: &'static mut [u32] = Box::leak(std::vec![0u32; words].into_boxed_slice());
    // The block is zeroed, word aligned, large enough for T and never freed. Register cells
    // are UnsafeCell based so shared references are sound.
    unsafe { &*(memory.as_ptr() as *const T) }
}

impl VirtualChip {
    pub(crate) fn new() -> Self {
        let rcc: &'static RccRegisters =
            leak_block(core::mem::size_of::<RccRegisters>().div_ceil(4));
        let flash: &'static FlashRegisters =
            leak_block(core::mem::size_of::<FlashRegisters>().div_ceil(4));

        rcc.cr.set(CR_RESET_VALUE);
        rcc.pllcfgr.set(PLLCFGR_RESET_VALUE);
        rcc.plli2scfgr.set(AUXILIARY_PLLCFGR_RESET_VALUE);
        rcc.pllsaicfgr.set(AUXILIARY_PLLCFGR_RESET_VALUE);

        Self {
            rcc,
            flash,
            stuck: Cell::new(0),
            trace: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn rcc_registers(&self) -> &'static RccRegisters {
        self.rcc
    }

    pub(crate) fn flash_registers(&self) -> &'static FlashRegisters {
        self.flash
    }

    /// Keep the given CR ready flags cleared from now on
    pub(crate) fn stick(&self, ready_mask: u32) {
        self.stuck.set(self.stuck.get() | ready_mask);
    }

    pub(crate) fn trace(&self) -> Vec<Snapshot> {
        self.trace.borrow().clone()
    }

    pub(crate) fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }

    fn propagate_ready_flags(&self) {
        let pairs = [
            (CR::HSION, CR::HSIRDY),
            (CR::HSEON, CR::HSERDY),
            (CR::PLLON, CR::PLLRDY),
            (CR::PLLI2SON, CR::PLLI2SRDY),
            (CR::PLLSAION, CR::PLLSAIRDY),
        ];

        let mut cr = self.rcc.cr.get();
        for (on, ready) in pairs {
            let ready_mask = ready.mask << ready.shift;
            let on = on.read(cr) == 1;
            if on && self.stuck.get() & ready_mask == 0 {
                cr |= ready_mask;
            } else {
                cr &= !ready_mask;
            }
        }

        // The PLLs only lock on a running input
        let input_ready = if self.rcc.pllcfgr.read(PLLCFGR::PLLSRC) == 1 {
            CR::HSERDY.read(cr) == 1
        } else {
            CR::HSIRDY.read(cr) == 1
        };
        if !input_ready {
            for ready in [CR::PLLRDY, CR::PLLI2SRDY, CR::PLLSAIRDY] {
                cr &= !(ready.mask << ready.shift);
            }
        }
        self.rcc.cr.set(cr);
    }

    fn follow_system_clock_switch(&self) {
        let cfgr = self.rcc.cfgr.extract();
        let sw = cfgr.read(CFGR::SW);
        let source_ready = match sw {
            0b00 => self.rcc.cr.is_set(CR::HSIRDY),
            0b01 => self.rcc.cr.is_set(CR::HSERDY),
            0b10 => self.rcc.cr.is_set(CR::PLLRDY),
            _ => false,
        };

        if source_ready && cfgr.read(CFGR::SWS) != sw {
            self.rcc.cfgr.set(
                (cfgr.get() & !(CFGR::SWS.mask << CFGR::SWS.shift)) | (sw << CFGR::SWS.shift),
            );
        }
    }

    fn pll_output_hz(&self) -> u32 {
        let pllcfgr = self.rcc.pllcfgr.extract();
        let config = PllConfiguration {
            source: if pllcfgr.read(PLLCFGR::PLLSRC) == 1 {
                PllSource::HSE
            } else {
                PllSource::HSI
            },
            m: pllcfgr.read(PLLCFGR::PLLM),
            n: pllcfgr.read(PLLCFGR::PLLN),
            p: (pllcfgr.read(PLLCFGR::PLLP) + 1) * 2,
            q: pllcfgr.read(PLLCFGR::PLLQ),
            r: 0,
        };
        config.calculate_main_output(HSE_FREQUENCY_HZ)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        let cfgr = self.rcc.cfgr.extract();
        let sws = cfgr.read(CFGR::SWS);
        let sysclk_hz = match sws {
            0b00 => HSI_FREQUENCY_HZ,
            0b01 => HSE_FREQUENCY_HZ,
            _ => self.pll_output_hz(),
        };
        let ahb_divisor = divisor::ahb_divisor(cfgr.read(CFGR::HPRE));

        Snapshot {
            sws,
            pll_on: self.rcc.cr.is_set(CR::PLLON),
            pll_ready: self.rcc.cr.is_set(CR::PLLRDY),
            ahb_divisor,
            apb1_divisor: divisor::apb_divisor(cfgr.read(CFGR::PPRE1)),
            apb2_divisor: divisor::apb_divisor(cfgr.read(CFGR::PPRE2)),
            latency: self.flash.acr.read(ACR::LATENCY) as usize,
            sysclk_hz,
            hclk_hz: sysclk_hz / ahb_divisor,
        }
    }
}

impl Spin for VirtualChip {
    fn limit(&self) -> Option<usize> {
        Some(POLL_LIMIT)
    }

    fn relax(&self) {
        self.propagate_ready_flags();
        self.follow_system_clock_switch();
        let snapshot = self.snapshot();
        self.trace.borrow_mut().push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_match_the_hardware_layout() {
        assert_eq!(0x94, core::mem::size_of::<RccRegisters>());
        assert_eq!(0x1C, core::mem::size_of::<FlashRegisters>());
    }

    #[test]
    fn reset_state() {
        let chip = VirtualChip::new();
        let snapshot = chip.snapshot();
        assert_eq!(0, snapshot.sws);
        assert_eq!(HSI_FREQUENCY_HZ, snapshot.hclk_hz);
        assert_eq!((1, 1, 1), (snapshot.ahb_divisor, snapshot.apb1_divisor, snapshot.apb2_divisor));
        assert_eq!(0, snapshot.latency);
        assert!(chip.trace().is_empty());
    }

    #[test]
    fn switch_waits_for_a_ready_source() {
        let chip = VirtualChip::new();
        chip.rcc_registers().cfgr.write(CFGR::SW.val(0b01));

        chip.relax();
        assert_eq!(0, chip.snapshot().sws);

        chip.rcc_registers().cr.set(chip.rcc_registers().cr.get() | (1 << 16));
        chip.relax();
        assert_eq!(1, chip.snapshot().sws);
        assert_eq!(2, chip.trace().len());
    }

    #[test]
    fn pll_needs_its_input_to_lock() {
        let chip = VirtualChip::new();
        let registers = chip.rcc_registers();
        registers.pllcfgr.set(PLLCFGR_RESET_VALUE | (1 << 22));
        registers.cr.set(registers.cr.get() | (1 << 24));

        chip.relax();
        assert!(chip.snapshot().pll_on);
        assert!(!chip.snapshot().pll_ready);

        // HSEON
        registers.cr.set(registers.cr.get() | (1 << 16));
        chip.relax();
        assert!(chip.snapshot().pll_ready);
    }
}
