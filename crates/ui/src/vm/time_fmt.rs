use chrono::{DateTime, Utc};

#[must_use]
pub fn format_saved_at(value: DateTime<Utc>) -> String {
    format!("Tersimpan {}", value.format("%H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::time::fixed_now;

    #[test]
    fn formats_time_of_day() {
        assert_eq!(format_saved_at(fixed_now()), "Tersimpan 22:13:20");
    }
}
