//! Fixed-point millimetre rendering
//!
//! Distances travel as `i32` micrometres. On the wire they are written as
//! decimal millimetres with a fixed number of fractional digits.

use core::fmt::{self, Write};

/// Micrometres per millimetre
pub const UM_PER_MM: i32 = 1000;

/// Maximum number of fractional digits (micrometre resolution)
const MAX_DECIMALS: u8 = 3;

/// Write `um` as millimetres with `decimals` fractional digits
///
/// Values are rounded half away from zero when `decimals < 3`.
/// A value that rounds to zero is written without a sign.
pub fn write_mm<W: Write>(w: &mut W, um: i32, decimals: u8) -> fmt::Result {
    let decimals = decimals.min(MAX_DECIMALS);
    let divisor = 10u64.pow(u32::from(MAX_DECIMALS - decimals));
    let frac_scale = 10u64.pow(u32::from(decimals));

    let magnitude = u64::from(um.unsigned_abs());
    let scaled = (magnitude + divisor / 2) / divisor;
    let whole = scaled / frac_scale;
    let frac = scaled % frac_scale;

    if um < 0 && scaled != 0 {
        w.write_char('-')?;
    }
    write!(w, "{}", whole)?;
    if decimals > 0 {
        write!(w, ".{:0width$}", frac, width = decimals as usize)?;
    }
    Ok(())
}

/// Parse a decimal millimetre value into micrometres
///
/// Accepts an optional sign, an integer part and up to three fractional
/// digits (`"20"`, `"-0.1"`, `"+1.25"`, `".5"`). Returns `None` for
/// anything else, including values that overflow `i32`.
pub fn parse_mm(text: &str) -> Option<i32> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if frac_part.len() > MAX_DECIMALS as usize {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut um: i64 = 0;
    for b in int_part.bytes() {
        um = um.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
        if um > i64::from(i32::MAX) {
            return None;
        }
    }
    um *= i64::from(UM_PER_MM);

    let mut frac_um: i64 = 0;
    let mut place: i64 = 100;
    for b in frac_part.bytes() {
        frac_um += i64::from(b - b'0') * place;
        place /= 10;
    }
    um += frac_um;

    let um = if negative { -um } else { um };
    i32::try_from(um).ok()
}
