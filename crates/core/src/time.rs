//! Minute arithmetic on wall-clock times.
//!
//! Times travel through the system as zero-padded 24-hour "HH:MM" strings
//! with no date or timezone attached. A slot on "Monday" is every Monday.
//! These helpers take explicit inputs and never read the real clock.

/// Minutes past midnight for an "HH:MM" string: "14:30" is 870.
///
/// Format checking is the validator's job ([`crate::rules::validate_slot`]);
/// unparsable components here count as zero.
pub fn time_to_minutes(time: &str) -> i32 {
    let (hours, minutes) = time.split_once(':').unwrap_or((time, "0"));
    hours.parse::<i32>().unwrap_or(0) * 60 + minutes.parse::<i32>().unwrap_or(0)
}

/// Inverse of [`time_to_minutes`]. Values of 1440 or more are not wrapped,
/// the hour field simply runs past 23.
pub fn minutes_to_time(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// 12-hour display form without a leading zero: "06:30" becomes "6:30 AM".
/// Midnight renders as "12:00 AM" and noon as "12:00 PM".
pub fn format_time_display(time: &str) -> String {
    let total = time_to_minutes(time);
    let hours = total / 60;
    let minutes = total % 60;
    let period = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hours}:{minutes:02} {period}")
}

/// Signed minutes from `start_time` to `end_time`. Zero or negative when the
/// end does not follow the start.
pub fn calculate_duration(start_time: &str, end_time: &str) -> i32 {
    time_to_minutes(end_time) - time_to_minutes(start_time)
}

/// Half-open interval intersection. Ranges that merely touch, like
/// 10:00-11:00 and 11:00-12:00, do not overlap, so back-to-back slots are
/// legal.
pub fn times_overlap(start1: &str, end1: &str, start2: &str, end2: &str) -> bool {
    let s1 = time_to_minutes(start1);
    let e1 = time_to_minutes(end1);
    let s2 = time_to_minutes(start2);
    let e2 = time_to_minutes(end2);

    s1 < e2 && s2 < e1
}

/// Structural "HH:MM" check: exactly five bytes, a colon in the middle,
/// hours 00-23 and minutes 00-59.
pub fn is_valid_time(time: &str) -> bool {
    let bytes = time.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    if ![bytes[0], bytes[1], bytes[3], bytes[4]]
        .iter()
        .all(u8::is_ascii_digit)
    {
        return false;
    }

    let hours = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let minutes = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    hours <= 23 && minutes <= 59
}
