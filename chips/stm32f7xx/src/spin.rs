// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Busy-waiting on hardware status flags.
//!
//! Oscillators, PLLs, the system clock multiplexer, the bus prescalers and the flash latency all
//! acknowledge a change through a status bit or a read-back. The drivers poll these through a
//! [Spin] policy so that a board can choose between waiting forever and giving up after a fixed
//! number of polls:
//!
//! ```rust,ignore
//! static WAIT: ReadyWait = ReadyWait::Bounded(10_000);
//! let clocks = Clocks::new(&rcc, &flash, &WAIT, DISCOVERY_CLOCK_CONFIG);
//! ```

use crate::errorcode::ClockError;

/// Polling policy for hardware status flags.
pub trait Spin {
    /// Number of unsuccessful polls before giving up. [None] polls forever.
    fn limit(&self) -> Option<usize>;

    /// Called before every poll.
    fn relax(&self) {
        core::hint::spin_loop();
    }
}

/// Stock polling policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyWait {
    /// Poll until the flag is observed. A flag that never asserts hangs the caller.
    Forever,
    /// Give up with [ClockError::Busy] after the given number of polls.
    Bounded(usize),
}

impl Spin for ReadyWait {
    fn limit(&self) -> Option<usize> {
        match self {
            ReadyWait::Forever => None,
            ReadyWait::Bounded(polls) => Some(*polls),
        }
    }
}

/// Poll `ready` according to `spin`.
///
/// # Errors
///
/// + [Err]\([ClockError::Busy]\): `ready` didn't return true within the polling limit
pub(crate) fn wait_until<F>(spin: &dyn Spin, mut ready: F) -> Result<(), ClockError>
where
    F: FnMut() -> bool,
{
    let limit = spin.limit();
    let mut polls = 0;

    loop {
        spin.relax();
        if ready() {
            return Ok(());
        }

        polls += 1;
        if let Some(limit) = limit {
            if polls >= limit {
                return Err(ClockError::Busy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn bounded_gives_up() {
        let polls = Cell::new(0);
        let result = wait_until(&ReadyWait::Bounded(5), || {
            polls.set(polls.get() + 1);
            false
        });
        assert_eq!(Err(ClockError::Busy), result);
        assert_eq!(5, polls.get());
    }

    #[test]
    fn forever_waits_for_the_flag() {
        let polls = Cell::new(0);
        let result = wait_until(&ReadyWait::Forever, || {
            polls.set(polls.get() + 1);
            polls.get() == 1000
        });
        assert_eq!(Ok(()), result);
        assert_eq!(1000, polls.get());
    }

    #[test]
    fn ready_flag_succeeds_on_first_poll() {
        assert_eq!(Ok(()), wait_until(&ReadyWait::Bounded(1), || true));
    }
}
