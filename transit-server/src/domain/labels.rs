//! Display labels for route summaries.
//!
//! Every backend formats durations, distances, fares and arrival times the
//! same way, so cards look identical whichever source produced them.

use chrono::{Duration, NaiveTime};

/// Format a travel time, e.g. `"32 min"`, `"1 hr 5 min"` or `"2 hr 0 min"`.
pub fn duration_label(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, m) => format!("{h} hr {m} min"),
    }
}

/// Format a walking distance, e.g. `"350 m"` or `"1.2 km"`.
pub fn walk_distance_label(meters: u32) -> String {
    if meters < 1000 {
        format!("{meters} m")
    } else {
        format!("{:.1} km", f64::from(meters) / 1000.0)
    }
}

/// Format a fare in Korean won with thousands separators, e.g. `"₩1,450"`.
pub fn fare_label(won: u32) -> String {
    let digits = won.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₩{grouped}")
}

/// Arrival time as `"HH:MM"`, wrapping past midnight.
pub fn arrival_time_label(departure: NaiveTime, minutes: u32) -> String {
    let arrival = departure + Duration::minutes(i64::from(minutes));
    arrival.format("%H:%M").to_string()
}
