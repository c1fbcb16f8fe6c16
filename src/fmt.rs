/// Format a float as a Swiss franc amount with thousands separators:
/// CHF 1'234.56
pub fn chf(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_seps = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_seps.push('\'');
        }
        with_seps.push(c);
    }
    let with_seps: String = with_seps.chars().rev().collect();

    if negative {
        format!("CHF -{with_seps}.{dec_part}")
    } else {
        format!("CHF {with_seps}.{dec_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chf_formatting() {
        assert_eq!(chf(50.0), "CHF 50.00");
        assert_eq!(chf(1234.56), "CHF 1'234.56");
        assert_eq!(chf(0.0), "CHF 0.00");
        assert_eq!(chf(-25.5), "CHF -25.50");
        assert_eq!(chf(1000000.99), "CHF 1'000'000.99");
    }
}
