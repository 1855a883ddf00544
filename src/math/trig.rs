//! Table-driven trigonometry
//!
//! Angles use the full `u32` range for one turn. The quarter-wave table is
//! generated at compile time from an integer Taylor series, so lookups never
//! touch floating point and every platform sees the same bits.

use super::fixed::{Fixed, FRACTION_BITS};

/// One full turn is 2^32, so angles wrap naturally
pub type Angle = u32;

pub const QUARTER_TURN: Angle = 1 << 30;
pub const HALF_TURN: Angle = 1 << 31;

/// log2 of the number of table steps per quarter turn
const TABLE_BITS: u32 = 10;
const TABLE_STEPS: usize = 1 << TABLE_BITS;
/// Angle bits below the table index, used for interpolation
const LERP_BITS: u32 = 30 - TABLE_BITS;

/// pi / 2 scaled by 2^60
const HALF_PI_Q60: i128 = 0x1921_FB54_442D_1846;
const Q60: u32 = 60;

/// sin(k * pi/2 / 1024) for k in 0..=1024, 8.24 raw values
static SINE_TABLE: [i32; TABLE_STEPS + 1] = build_sine_table();

const fn sine_q60(x: i128) -> i128 {
    // x - x^3/3! + x^5/5! - ... ; 12 terms is exact to well below 2^-24 on [0, pi/2]
    let x2 = (x * x) >> Q60;
    let mut term = x;
    let mut sum = x;
    let mut n = 1;
    while n < 12 {
        term = -((term * x2) >> Q60) / ((2 * n) * (2 * n + 1));
        sum += term;
        n += 1;
    }
    sum
}

const fn build_sine_table() -> [i32; TABLE_STEPS + 1] {
    let mut table = [0i32; TABLE_STEPS + 1];
    let mut k = 0;
    while k <= TABLE_STEPS {
        let x = HALF_PI_Q60 * k as i128 / TABLE_STEPS as i128;
        let shift = Q60 - FRACTION_BITS;
        let rounded = (sine_q60(x) + (1 << (shift - 1))) >> shift;
        table[k] = rounded as i32;
        k += 1;
    }
    table
}

/// Sine of an angle, linearly interpolated between table entries
pub fn sin(angle: Angle) -> Fixed {
    let quadrant = angle >> 30;
    let index = ((angle >> LERP_BITS) as usize) & (TABLE_STEPS - 1);
    let frac = (angle & ((1 << LERP_BITS) - 1)) as i64;

    // Odd quadrants run the table backwards
    let (a, b) = if quadrant & 1 == 0 {
        (SINE_TABLE[index], SINE_TABLE[index + 1])
    } else {
        (SINE_TABLE[TABLE_STEPS - index], SINE_TABLE[TABLE_STEPS - index - 1])
    };
    let value = a as i64 + (((b - a) as i64 * frac) >> LERP_BITS);

    if quadrant >= 2 {
        Fixed::from_raw(-(value as i32))
    } else {
        Fixed::from_raw(value as i32)
    }
}

pub fn cos(angle: Angle) -> Fixed {
    sin(angle.wrapping_add(QUARTER_TURN))
}

/// Convert whole degrees to an angle (any sign, wraps)
pub fn angle_from_degrees(degrees: i32) -> Angle {
    let turn = 1i64 << 32;
    ((degrees as i64).rem_euclid(360) * turn / 360) as Angle
}
