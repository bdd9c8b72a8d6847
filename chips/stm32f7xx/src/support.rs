// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Cortex-M7 barrier instructions.

/// Data synchronization barrier followed by an instruction synchronization barrier.
///
/// Issued after the core clock has been switched to the PLL so that no instruction fetched
/// under the old clock configuration runs after the switch.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[inline(always)]
pub fn dsb_isb() {
    use core::arch::asm;
    unsafe {
        asm!("dsb 0xF", options(nostack, preserves_flags));
        asm!("isb 0xF", options(nostack, preserves_flags));
    }
}

/// Barrier (host build)
#[cfg(not(all(target_arch = "arm", target_os = "none")))]
#[inline(always)]
pub fn dsb_isb() {
    use core::sync::atomic::{compiler_fence, Ordering};
    compiler_fence(Ordering::SeqCst);
}
