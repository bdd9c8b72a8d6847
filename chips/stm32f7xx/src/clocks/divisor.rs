// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Divisor to prescaler encoding.
//!
//! The bus prescalers can only divide by powers of two. These helpers map an arbitrary divisor
//! to a power of two and then to the HPRE/PPREx register encodings. A divisor of 0 or 1 always
//! means "no division".

/// Largest exponent considered by the power of two search.
const MAX_EXPONENT: u32 = 19;

/// HPRE encoding to divisor. There is no divide-by-32 entry.
const AHB_DIVISORS: [u32; 16] = [1, 1, 1, 1, 1, 1, 1, 1, 2, 4, 8, 16, 64, 128, 256, 512];

/// PPREx encoding to divisor
const APB_DIVISORS: [u32; 8] = [1, 1, 1, 1, 2, 4, 8, 16];

/// Exponent of the power of two closest to `divisor`.
///
/// The search walks the exponents upwards and stops as soon as the error stops decreasing, so
/// when two powers of two are equally close the smaller one wins.
pub fn nearest_power_of_two_exponent(divisor: u32) -> u32 {
    let mut best = 0;
    let mut best_error = u32::MAX;

    for exponent in 0..=MAX_EXPONENT {
        let error = divisor.abs_diff(1 << exponent);
        if error >= best_error {
            break;
        }
        best = exponent;
        best_error = error;
    }

    best
}

/// Power of two closest to `divisor`.
pub fn nearest_power_of_two(divisor: u32) -> u32 {
    1 << nearest_power_of_two_exponent(divisor)
}

/// Exponent of the smallest power of two that is not smaller than `divisor`.
pub fn largest_power_of_two_exponent(divisor: u32) -> u32 {
    let exponent = nearest_power_of_two_exponent(divisor);
    if (1 << exponent) < divisor {
        exponent + 1
    } else {
        exponent
    }
}

/// Smallest power of two that is not smaller than `divisor`.
///
/// Used where a prescaler must never divide less than requested.
pub fn largest_power_of_two(divisor: u32) -> u32 {
    1 << largest_power_of_two_exponent(divisor)
}

/// HPRE encoding for `divisor`, rounding up to the next available setting.
pub fn find_ahb_prescaler_encoding(divisor: u32) -> u32 {
    if divisor <= 1 {
        return 0;
    }
    if divisor >= 512 {
        return 0b1111;
    }

    match largest_power_of_two_exponent(divisor) {
        0 => 0,
        exponent @ 1..=4 => 0b1000 + exponent - 1,
        // Divide-by-32 doesn't exist, use divide-by-64
        5 => 0b1100,
        exponent => 0b1000 + exponent - 2,
    }
}

/// PPREx encoding for `divisor`, rounding up and saturating at divide-by-16.
pub fn find_apb_prescaler_encoding(divisor: u32) -> u32 {
    match largest_power_of_two_exponent(divisor) {
        0 => 0,
        exponent @ 1..=3 => 0b100 + exponent - 1,
        _ => 0b111,
    }
}

/// Divisor applied by an HPRE encoding.
pub fn ahb_divisor(encoding: u32) -> u32 {
    AHB_DIVISORS[(encoding & 0b1111) as usize]
}

/// Divisor applied by a PPREx encoding.
pub fn apb_divisor(encoding: u32) -> u32 {
    APB_DIVISORS[(encoding & 0b111) as usize]
}
