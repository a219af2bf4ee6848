// src/transform/date.rs
use chrono::NaiveDate;

const ISO_DATE: &str = "%Y-%m-%d";
const BR_DATE: &str = "%d/%m/%Y";

/// Parse a draw date in either `yyyy-mm-dd` form (optionally carrying a
/// time-of-day tail, which is discarded) or `dd/mm/yyyy` form.
///
/// Anything else, including impossible calendar dates, yields `None`. A
/// value holding both separators is resolved as ISO, `-` checked first.
pub fn parse_date(input: Option<&str>) -> Option<NaiveDate> {
    let v = input?.trim();
    if v.is_empty() {
        return None;
    }

    if v.contains('-') {
        if let Ok(d) = NaiveDate::parse_from_str(v, ISO_DATE) {
            return Some(d);
        }
        // "yyyy-mm-ddThh:mm:ss" / "yyyy-mm-dd hh:mm:ss": keep the date part
        let date_part = v.split(['T', ' ']).next()?;
        return NaiveDate::parse_from_str(date_part, ISO_DATE).ok();
    }

    if v.contains('/') {
        return NaiveDate::parse_from_str(v, BR_DATE).ok();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_br_and_iso_shapes() {
        assert_eq!(parse_date(Some("15/03/2023")), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_date(Some("2023-03-15")), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_date(Some(" 2023-03-15 ")), Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn discards_time_of_day_tail() {
        assert_eq!(parse_date(Some("2023-03-15T10:30:00")), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_date(Some("2023-03-15 10:30:00")), Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn rejects_invalid_calendar_dates() {
        assert_eq!(parse_date(Some("31/02/2020")), None);
        assert_eq!(parse_date(Some("2020-02-31")), None);
        assert_eq!(parse_date(Some("00/00/0000")), None);
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(parse_date(None), None);
        assert_eq!(parse_date(Some("")), None);
        assert_eq!(parse_date(Some("15.03.2023")), None);
        assert_eq!(parse_date(Some("yesterday")), None);
        assert_eq!(parse_date(Some("20230315")), None);
    }

    #[test]
    fn mixed_separators_take_the_iso_branch() {
        // '-' wins, and "15/03-2023" is not a valid ISO date
        assert_eq!(parse_date(Some("15/03-2023")), None);
    }
}
