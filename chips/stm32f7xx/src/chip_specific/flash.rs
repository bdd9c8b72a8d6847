// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Chip-specific flash code

use crate::flash::{FlashLatency, WaitStateRow};

pub trait FlashChipSpecific {
    /// Wait-state table, ordered by decreasing minimum voltage and ended by [WaitStateRow::END]
    const WAIT_STATE_TABLE: &'static [WaitStateRow];

    /// Wait states that are enough for any frequency the chip supports
    const MAX_WAIT_STATES: FlashLatency;
}
