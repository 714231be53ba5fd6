//! Money helpers.
//!
//! Amounts are carried through the whole system as integer cents (`i64`) so
//! the balance arithmetic stays exact. Display formatting follows the es-AR
//! convention the dashboard uses: `.` as thousands separator, `,` before the
//! two decimal digits.

/// Format cents as an es-AR currency string, e.g. `-123456` -> `"-$1.234,56"`.
pub fn format_ars(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = (abs / 100).to_string();
    let frac = abs % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    let digits = whole.as_bytes();
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*d as char);
    }

    format!("{sign}${grouped},{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::format_ars;

    #[test]
    fn formats_small_amounts() {
        assert_eq!(format_ars(0), "$0,00");
        assert_eq!(format_ars(5), "$0,05");
        assert_eq!(format_ars(950), "$9,50");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_ars(123_456), "$1.234,56");
        assert_eq!(format_ars(100_000_000), "$1.000.000,00");
        assert_eq!(format_ars(9_876_543_210), "$98.765.432,10");
    }

    #[test]
    fn negative_amounts_keep_sign_before_symbol() {
        assert_eq!(format_ars(-123_456), "-$1.234,56");
        assert_eq!(format_ars(-1), "-$0,01");
    }
}
