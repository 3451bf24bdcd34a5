//! Decimal rounding for reported figures.
//!
//! Values are rounded on the digits of their shortest round-trip decimal form (what `Display`
//! prints), half away from zero. `(x * 100.0).round() / 100.0` would instead round the binary
//! value, so `99.995` would become `99.99` and `1.005` would become `1.0`.

/// Round `value` to `decimals` places, half away from zero. Non-finite values pass through.
pub fn round_half_away(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let repr = value.abs().to_string();
    let (whole, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let decimals = decimals as usize;
    if frac.len() <= decimals {
        return value;
    }

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(frac.bytes().take(decimals))
        .map(|b| b - b'0')
        .collect();
    let mut whole_len = whole.len();

    if frac.as_bytes()[decimals] >= b'5' {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            whole_len += 1;
        }
    }

    let mut text = String::with_capacity(digits.len() + 1);
    for (idx, digit) in digits.iter().enumerate() {
        if idx == whole_len {
            text.push('.');
        }
        text.push(char::from(b'0' + digit));
    }

    match text.parse::<f64>() {
        // Never report a negative zero.
        Ok(rounded) if rounded == 0. => 0.,
        Ok(rounded) => rounded.copysign(value),
        Err(_) => value,
    }
}
