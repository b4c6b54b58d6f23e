//! Formatting utilities used for CLI output.

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

pub fn mins2readable(mins: i64, short: bool) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    if short {
        // es: 02:25
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // es: 02h 25m
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}
