use chrono::NaiveDate;

/// Parse the date part of a `"YYYY-MM-DD-HH"` cutoff. The hour is checked for
/// shape but otherwise ignored.
pub fn parse_cutoff_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // minimal length + separators check
    if !s.is_ascii() || s.len() < 10 || &s[4..5] != "-" || &s[7..8] != "-" {
        return None;
    }
    let rest = &s[10..];
    if !rest.is_empty() {
        let hour = rest.strip_prefix('-')?;
        if hour.is_empty() || !hour.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
