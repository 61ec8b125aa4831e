use chrono::{DateTime, Local, NaiveDate, Utc};

/// Parses a calendar date typed by a user.
/// Accepts ISO dates ("2024-06-01") first, then anything `dateparser` understands
/// ("2024/06/01", "June 1, 2024", ...), read in the local timezone.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    dateparser::parse_with_timezone(input, &Local)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

/// Renders a stored UTC timestamp in the local timezone
pub fn format_timestamp_to_local(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// Region code an area belongs to: the first two characters of its code.
pub fn region_code_for(area_code: &str) -> String {
    area_code.chars().take(2).collect()
}

/// Sanitizes a string for use in a filename
/// Replaces invalid filename characters with hyphens
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
