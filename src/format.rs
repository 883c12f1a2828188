/// Formats an amount as Indonesian rupiah rounded to whole units, with comma
/// thousands separators: `8000000.4` → `"Rp 8,000,000"`.
pub fn rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("Rp {amount}");
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}
