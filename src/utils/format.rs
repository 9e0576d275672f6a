/// Formats an amount the way a ru-RU locale renders roubles, with plain
/// spaces: `1234.5` becomes `1 234,50 ₽`.
pub fn format_rub(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02} ₽", sign, grouped, fraction)
}

pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roubles_are_grouped() {
        assert_eq!(format_rub(0.0), "0,00 ₽");
        assert_eq!(format_rub(999.999), "1 000,00 ₽");
        assert_eq!(format_rub(1234.5), "1 234,50 ₽");
        assert_eq!(format_rub(1234567.891), "1 234 567,89 ₽");
        assert_eq!(format_rub(-42.1), "-42,10 ₽");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(12.3456), "12.35%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
