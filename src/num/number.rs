/// Renders a parsed number the way the parser reads numbers back: integral
/// values without a fraction, everything else as plain decimal without an
/// exponent. Non-finite values render as `null`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value as i64).to_string();
    }
    let mut buffer = ryu::Buffer::new();
    let raw = buffer.format_finite(value);
    if raw.contains(['e', 'E']) {
        return expand_exponent(raw);
    }
    trim_number(raw.to_string())
}

fn expand_exponent(raw: &str) -> String {
    let (mantissa, exponent) = raw.split_once(['e', 'E']).unwrap_or((raw, "0"));
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_digits}{frac_digits}");
    let point = int_digits.len() as i32 + exponent;

    let mut out = String::with_capacity(digits.len() + point.unsigned_abs() as usize + 3);
    if negative {
        out.push('-');
    }
    if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', point.unsigned_abs() as usize));
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', point as usize - digits.len()));
    } else {
        let (head, tail) = digits.split_at(point as usize);
        out.push_str(head);
        out.push('.');
        out.push_str(tail);
    }
    trim_number(out)
}

fn trim_number(mut value: String) -> String {
    if value.contains('.') {
        let trimmed = value.trim_end_matches('0').trim_end_matches('.').len();
        value.truncate(trimmed);
    }
    if value.trim_start_matches('-').bytes().all(|b| b == b'0') {
        return "0".to_string();
    }
    value
}
