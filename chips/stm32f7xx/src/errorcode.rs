// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Error enum for clock tree operations

use core::fmt;

use crate::clocks::pll_config::PllParameter;
use crate::flash::WaitStateError;

/// Errors reported by the clock drivers.
///
/// Every operation either succeeds or leaves the clock tree in a state that is safe to run
/// from, so none of these variants imply that the hardware must be reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockError {
    /// A PLL factor lies outside its legal range
    InvalidPll(PllParameter),
    /// The flash has no wait-state setting for the frequency at the supply voltage
    NoWaitStates(WaitStateError),
    /// The requested frequency can't be produced from the available sources
    Unreachable,
    /// A hardware status flag didn't assert in time; retry
    Busy,
    /// Auxiliary PLLs can't be configured before the main PLL
    MainPllNotConfigured,
    /// The clock drives the system clock and can't be stopped
    InUse,
}

impl From<ClockError> for usize {
    fn from(err: ClockError) -> usize {
        match err {
            ClockError::InvalidPll(_) => 1,
            ClockError::NoWaitStates(_) => 2,
            ClockError::Unreachable => 3,
            ClockError::Busy => 4,
            ClockError::MainPllNotConfigured => 5,
            ClockError::InUse => 6,
        }
    }
}

impl From<WaitStateError> for ClockError {
    fn from(err: WaitStateError) -> Self {
        ClockError::NoWaitStates(err)
    }
}

impl From<PllParameter> for ClockError {
    fn from(parameter: PllParameter) -> Self {
        ClockError::InvalidPll(parameter)
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::InvalidPll(parameter) => {
                write!(f, "PLL factor {:?} out of range", parameter)
            }
            ClockError::NoWaitStates(WaitStateError::NoVoltageRow) => {
                f.write_str("no flash wait-state row for the supply voltage")
            }
            ClockError::NoWaitStates(WaitStateError::FrequencyTooHigh) => {
                f.write_str("frequency too high for the supply voltage")
            }
            ClockError::Unreachable => f.write_str("frequency can't be reached"),
            ClockError::Busy => f.write_str("hardware didn't respond"),
            ClockError::MainPllNotConfigured => f.write_str("main PLL not configured"),
            ClockError::InUse => f.write_str("clock drives the system clock"),
        }
    }
}
