//! Number/string conversions shared by the formatter and the compiler.

/// Whether an object key is one a number index signature applies to.
///
/// `"1"` and `"1.5"` qualify; `"01"`, `"1.0"` and `" 1"` do not, since
/// reading them back through `Number` and printing would change the key.
pub fn is_numeric_literal_name(name: &str) -> bool {
    match name {
        "NaN" | "Infinity" | "-Infinity" => true,
        _ => name
            .parse::<f64>()
            .is_ok_and(|value| value.is_finite() && js_number_to_string(value) == name),
    }
}

/// Text of a number as the emitted validators and error messages print it.
/// Number literal keys and stringified `${1 | 2}` template members use the
/// same form.
pub fn js_number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-Infinity".to_string()
        } else {
            "Infinity".to_string()
        };
    }

    let abs = value.abs();
    if !(1e-6..1e21).contains(&abs) {
        let mut formatted = format!("{:e}", value);
        if let Some(split) = formatted.find('e') {
            let (mantissa, exp) = formatted.split_at(split);
            let exp_digits = &exp[1..];
            let (sign, digits) = if let Some(rest) = exp_digits.strip_prefix('-') {
                ('-', rest)
            } else {
                ('+', exp_digits)
            };
            let trimmed = digits.trim_start_matches('0');
            let digits = if trimmed.is_empty() { "0" } else { trimmed };
            formatted = format!("{mantissa}e{sign}{digits}");
        }
        return formatted;
    }

    let formatted = value.to_string();
    if formatted == "-0" {
        "0".to_string()
    } else {
        formatted
    }
}

/// Whether `text` is accepted by a `${number}` template placeholder.
///
/// Mirrors `isFinite(+text)` on a non-empty, unpadded string: decimal literals
/// with optional sign, fraction and exponent, plus unsigned `0x` / `0o` / `0b`
/// integer literals.
pub fn is_numeric_string(text: &str) -> bool {
    if text.is_empty() || text.trim() != text {
        return false;
    }

    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return text[2..].chars().all(|c| c.is_digit(radix));
        }
    }

    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
        None => (unsigned, None),
    };

    let (int_part, frac_part) = match mantissa.find('.') {
        Some(pos) => (&mantissa[..pos], Some(&mantissa[pos + 1..])),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return false;
    }
    if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
        return false;
    }

    if let Some(exponent) = exponent {
        let digits = exponent
            .strip_prefix('-')
            .or_else(|| exponent.strip_prefix('+'))
            .unwrap_or(exponent);
        if digits.is_empty() || !all_digits(digits) {
            return false;
        }
    }

    unsigned.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Whether `text` is accepted by a `${bigint}` template placeholder.
pub fn is_bigint_string(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Quote a string the way JavaScript source would (double quotes).
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[path = "../tests/utils_tests.rs"]
mod tests;
