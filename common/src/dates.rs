use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;

// the scheduler runs close to midnight; the configured timezone, not UTC,
// decides which calendar day a run belongs to
pub fn today_string(timezone: &Tz) -> String {
  let now = Utc::now().with_timezone(timezone);
  return now.format("%Y-%m-%d").to_string();
}

pub fn previous_day(date: &str) -> String {
  let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
  let previous = parsed_date.checked_sub_days(Days::new(1)).unwrap();
  return previous.format("%Y-%m-%d").to_string();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn previous_day_steps_back_one_calendar_day() {
    assert_eq!(previous_day("2024-01-02"), "2024-01-01");
  }

  #[test]
  fn previous_day_crosses_month_and_year_boundaries() {
    assert_eq!(previous_day("2024-03-01"), "2024-02-29");
    assert_eq!(previous_day("2024-01-01"), "2023-12-31");
  }

  #[test]
  fn today_string_is_a_calendar_date() {
    let today = today_string(&chrono_tz::Asia::Tokyo);
    assert_eq!(today.len(), 10);
    assert!(NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
  }
}
