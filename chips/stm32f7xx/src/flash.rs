// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Embedded flash interface: access latency and the ART accelerator.
//!
//! Flash reads take a number of wait states that depends on the HCLK frequency and on the
//! supply voltage. The required count comes from a table of rows, one per supply voltage range:
//!
//! ```text
//!  min voltage | max HCLK for 0, 1, 2, ... wait states
//! -------------+---------------------------------------
//!      2700 mV | 30, 60, 90, 120, 150, 180, 210, 216
//!      2400 mV | 24, 48, 72, 96, ...
//!          ... | ...
//!            0 | (end of table)
//! ```
//!
//! The first row whose minimum voltage the supply reaches is used. In that row, the first
//! column whose maximum frequency is at least the HCLK frequency gives the wait-state count.

use core::marker::PhantomData;

use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::chip_specific::flash::FlashChipSpecific;
use crate::errorcode::ClockError;
use crate::spin::{wait_until, Spin};

register_structs! {
    /// FLASH
    pub(crate) FlashRegisters {
        /// Flash access control register
        (0x000 => pub(crate) acr: ReadWrite<u32, ACR::Register>),
        /// key, status, control and option registers
        (0x004 => _reserved0),
        (0x01C => @END),
    }
}

register_bitfields![u32,
    pub(crate) ACR [
        /// Latency
        LATENCY OFFSET(0) NUMBITS(4) [],
        /// Prefetch enable
        PRFTEN OFFSET(8) NUMBITS(1) [],
        /// ART Accelerator Enable
        ARTEN OFFSET(9) NUMBITS(1) [],
        /// ART Accelerator reset
        ARTRST OFFSET(11) NUMBITS(1) []
    ]
];

const FLASH_BASE: *const FlashRegisters = 0x4002_3C00 as *const FlashRegisters;

/// Number of flash wait states
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum FlashLatency {
    Latency0,
    Latency1,
    Latency2,
    Latency3,
    Latency4,
    Latency5,
    Latency6,
    Latency7,
    Latency8,
    Latency9,
    Latency10,
    Latency11,
    Latency12,
    Latency13,
    Latency14,
    Latency15,
}

impl FlashLatency {
    // LATENCY is 4 bits wide, so every value decodes
    fn from_encoding(encoding: u32) -> Self {
        match encoding & 0b1111 {
            0 => FlashLatency::Latency0,
            1 => FlashLatency::Latency1,
            2 => FlashLatency::Latency2,
            3 => FlashLatency::Latency3,
            4 => FlashLatency::Latency4,
            5 => FlashLatency::Latency5,
            6 => FlashLatency::Latency6,
            7 => FlashLatency::Latency7,
            8 => FlashLatency::Latency8,
            9 => FlashLatency::Latency9,
            10 => FlashLatency::Latency10,
            11 => FlashLatency::Latency11,
            12 => FlashLatency::Latency12,
            13 => FlashLatency::Latency13,
            14 => FlashLatency::Latency14,
            _ => FlashLatency::Latency15,
        }
    }
}

impl TryFrom<usize> for FlashLatency {
    type Error = &'static str;

    fn try_from(item: usize) -> Result<Self, Self::Error> {
        if item <= 15 {
            Ok(FlashLatency::from_encoding(item as u32))
        } else {
            Err("Error value for FlashLatency::try_from")
        }
    }
}

impl From<FlashLatency> for usize {
    fn from(item: FlashLatency) -> Self {
        item as usize
    }
}

/// One supply voltage range of a wait-state table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct WaitStateRow {
    /// Lowest supply voltage, in mV, for which the row applies. 0 ends the table.
    pub min_voltage_mv: u32,
    /// Highest HCLK frequency, in MHz, for 0, 1, 2, ... wait states. 0 ends the row.
    pub max_frequency_mhz: [u32; 11],
}

impl WaitStateRow {
    /// Row marking the end of a table
    pub const END: WaitStateRow = WaitStateRow {
        min_voltage_mv: 0,
        max_frequency_mhz: [0; 11],
    };
}

/// Reason a wait-state lookup failed
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WaitStateError {
    /// The supply voltage is below every row of the table
    NoVoltageRow,
    /// The frequency is above the last column of the row
    FrequencyTooHigh,
}

/// Minimum number of wait states for `frequency_hz` at `voltage_mv`.
///
/// Rows are scanned in table order and columns in increasing wait-state order.
pub fn lookup_wait_states(
    table: &[WaitStateRow],
    frequency_hz: u32,
    voltage_mv: u32,
) -> Result<FlashLatency, WaitStateError> {
    let row = table
        .iter()
        .take_while(|row| row.min_voltage_mv != 0)
        .find(|row| voltage_mv >= row.min_voltage_mv)
        .ok_or(WaitStateError::NoVoltageRow)?;

    let wait_states = row
        .max_frequency_mhz
        .iter()
        .take_while(|max_frequency_mhz| **max_frequency_mhz != 0)
        .position(|max_frequency_mhz| {
            u64::from(frequency_hz) <= u64::from(*max_frequency_mhz) * 1_000_000
        })
        .ok_or(WaitStateError::FrequencyTooHigh)?;

    FlashLatency::try_from(wait_states).map_err(|_| WaitStateError::FrequencyTooHigh)
}

pub struct Flash<'a, ChipSpecs> {
    registers: &'a FlashRegisters,
    spin: &'a dyn Spin,
    _marker: PhantomData<ChipSpecs>,
}

impl<'a, ChipSpecs> Flash<'a, ChipSpecs> {
    pub fn new(spin: &'a dyn Spin) -> Self {
        Self {
            // The FLASH interface is always mapped at FLASH_BASE and all accesses go through
            // volatile cells.
            registers: unsafe { &*FLASH_BASE },
            spin,
            _marker: PhantomData,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: &'a FlashRegisters, spin: &'a dyn Spin) -> Self {
        Self {
            registers,
            spin,
            _marker: PhantomData,
        }
    }

    pub fn get_latency(&self) -> FlashLatency {
        FlashLatency::from_encoding(self.registers.acr.read(ACR::LATENCY))
    }

    /// Program the flash latency and wait until the interface reports it.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::Busy]\): the new latency wasn't read back in time
    pub fn set_latency(&self, flash_latency: FlashLatency) -> Result<(), ClockError> {
        self.registers
            .acr
            .modify(ACR::LATENCY.val(flash_latency as u32));

        wait_until(self.spin, || self.get_latency() == flash_latency).inspect_err(|_| {
            log::error!("flash latency {:?} not acknowledged", flash_latency);
        })
    }

    /// Reset the ART accelerator, then enable it together with prefetch.
    pub fn enable_art_accelerator(&self) {
        // ARTRST is only honoured while the accelerator is disabled
        self.registers.acr.modify(ACR::ARTEN::CLEAR);
        self.registers.acr.modify(ACR::ARTRST::SET);
        self.registers.acr.modify(ACR::ARTRST::CLEAR);
        self.registers.acr.modify(ACR::ARTEN::SET + ACR::PRFTEN::SET);
    }
}

impl<ChipSpecs: FlashChipSpecific> Flash<'_, ChipSpecs> {
    /// Wait states required by the chip for `frequency_hz` at `voltage_mv`.
    pub fn get_number_wait_cycles_based_on_frequency(
        &self,
        frequency_hz: u32,
        voltage_mv: u32,
    ) -> Result<FlashLatency, WaitStateError> {
        lookup_wait_states(ChipSpecs::WAIT_STATE_TABLE, frequency_hz, voltage_mv)
    }

    /// Apply the wait states required for `frequency_hz` at `voltage_mv`.
    ///
    /// Nothing is written if the lookup fails.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::NoWaitStates]\): the table has no entry for the frequency and voltage
    /// + [Err]\([ClockError::Busy]\): the new latency wasn't read back in time
    pub fn configure_wait_states(
        &self,
        frequency_hz: u32,
        voltage_mv: u32,
    ) -> Result<FlashLatency, ClockError> {
        let flash_latency = self
            .get_number_wait_cycles_based_on_frequency(frequency_hz, voltage_mv)
            .inspect_err(|err| {
                log::warn!(
                    "no flash latency for {}Hz at {}mV: {:?}",
                    frequency_hz,
                    voltage_mv,
                    err
                );
            })?;
        self.set_latency(flash_latency)?;
        Ok(flash_latency)
    }

    /// Apply the highest wait-state count the chip needs at any frequency.
    pub fn set_worst_case_latency(&self) -> Result<(), ClockError> {
        self.set_latency(ChipSpecs::MAX_WAIT_STATES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_chip::{TestSpecs, VirtualChip, F74X_WAIT_STATES};
    use proptest::prelude::*;

    const MHZ: u32 = 1_000_000;

    #[test]
    fn lookup_at_nominal_supply() {
        let lookup = |frequency_hz| lookup_wait_states(&F74X_WAIT_STATES, frequency_hz, 3300);

        assert_eq!(Ok(FlashLatency::Latency0), lookup(16 * MHZ));
        assert_eq!(Ok(FlashLatency::Latency0), lookup(30 * MHZ));
        assert_eq!(Ok(FlashLatency::Latency1), lookup(30 * MHZ + 1));
        assert_eq!(Ok(FlashLatency::Latency6), lookup(200 * MHZ));
        assert_eq!(Ok(FlashLatency::Latency7), lookup(216 * MHZ));
        assert_eq!(Err(WaitStateError::FrequencyTooHigh), lookup(216 * MHZ + 1));
    }

    #[test]
    fn lookup_picks_the_voltage_row() {
        assert_eq!(
            Ok(FlashLatency::Latency7),
            lookup_wait_states(&F74X_WAIT_STATES, 180 * MHZ, 2500)
        );
        assert_eq!(
            Ok(FlashLatency::Latency9),
            lookup_wait_states(&F74X_WAIT_STATES, 216 * MHZ, 2100)
        );
        assert_eq!(
            Ok(FlashLatency::Latency8),
            lookup_wait_states(&F74X_WAIT_STATES, 180 * MHZ, 1800)
        );
        assert_eq!(
            Err(WaitStateError::FrequencyTooHigh),
            lookup_wait_states(&F74X_WAIT_STATES, 200 * MHZ, 1800)
        );
        assert_eq!(
            Err(WaitStateError::NoVoltageRow),
            lookup_wait_states(&F74X_WAIT_STATES, 16 * MHZ, 1700)
        );
    }

    #[test]
    fn lookup_stops_at_the_end_of_the_slice() {
        let table = [F74X_WAIT_STATES[0]];
        assert_eq!(
            Err(WaitStateError::NoVoltageRow),
            lookup_wait_states(&table, 16 * MHZ, 2000)
        );
        assert_eq!(Err(WaitStateError::NoVoltageRow), lookup_wait_states(&[], 0, 3300));
    }

    #[test]
    fn latency_is_read_back() {
        let chip = VirtualChip::new();
        let flash: Flash<TestSpecs> = Flash::with_registers(chip.flash_registers(), &chip);

        assert_eq!(FlashLatency::Latency0, flash.get_latency());
        assert_eq!(Ok(()), flash.set_worst_case_latency());
        assert_eq!(FlashLatency::Latency9, flash.get_latency());
        assert_eq!(Ok(FlashLatency::Latency6), flash.configure_wait_states(200 * MHZ, 3300));
        assert_eq!(FlashLatency::Latency6, flash.get_latency());
    }

    #[test]
    fn failed_lookup_leaves_latency_alone() {
        let chip = VirtualChip::new();
        let flash: Flash<TestSpecs> = Flash::with_registers(chip.flash_registers(), &chip);

        assert_eq!(Ok(()), flash.set_latency(FlashLatency::Latency9));
        assert_eq!(
            Err(ClockError::NoWaitStates(WaitStateError::FrequencyTooHigh)),
            flash.configure_wait_states(200 * MHZ, 1800)
        );
        assert_eq!(FlashLatency::Latency9, flash.get_latency());
    }

    #[test]
    fn art_accelerator_enabled_with_prefetch() {
        let chip = VirtualChip::new();
        let flash: Flash<TestSpecs> = Flash::with_registers(chip.flash_registers(), &chip);
        assert_eq!(Ok(()), flash.set_latency(FlashLatency::Latency5));

        flash.enable_art_accelerator();

        let acr = &chip.flash_registers().acr;
        assert!(acr.is_set(ACR::ARTEN));
        assert!(acr.is_set(ACR::PRFTEN));
        assert!(!acr.is_set(ACR::ARTRST));
        assert_eq!(FlashLatency::Latency5, flash.get_latency());
    }

    fn rank(result: Result<FlashLatency, WaitStateError>) -> usize {
        result.map_or(usize::MAX, usize::from)
    }

    proptest! {
        #[test]
        fn wait_states_grow_with_frequency(
            voltage_mv in 1800u32..3600,
            low_hz in 0u32..=216_000_000,
            high_hz in 0u32..=216_000_000,
        ) {
            let (low_hz, high_hz) = (low_hz.min(high_hz), low_hz.max(high_hz));
            prop_assert!(
                rank(lookup_wait_states(&F74X_WAIT_STATES, low_hz, voltage_mv))
                    <= rank(lookup_wait_states(&F74X_WAIT_STATES, high_hz, voltage_mv))
            );
        }

        #[test]
        fn wait_states_shrink_with_voltage(
            frequency_hz in 0u32..=216_000_000,
            low_mv in 1800u32..3600,
            high_mv in 1800u32..3600,
        ) {
            let (low_mv, high_mv) = (low_mv.min(high_mv), low_mv.max(high_mv));
            prop_assert!(
                rank(lookup_wait_states(&F74X_WAIT_STATES, frequency_hz, high_mv))
                    <= rank(lookup_wait_states(&F74X_WAIT_STATES, frequency_hz, low_mv))
            );
        }
    }
}
