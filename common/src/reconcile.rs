use std::collections::HashMap;

use crate::dates;
use crate::structs::{DailyRecord, EntityStats, MetricSnapshot};

// builds today's record from a fresh fetch and the loaded history. the
// baseline is strictly the previous calendar day: an older record never
// serves as "yesterday", a gap in the schedule resets every delta to zero.
// entities that stopped appearing upstream are dropped, not carried forward.
pub fn build_daily_record(today_date: &str, fetched: &[EntityStats], history: &[DailyRecord]) -> DailyRecord {
  let prior_date = dates::previous_day(today_date);
  let prior_record = history.iter().rev().find(|record| {
    return record.date == prior_date;
  });
  let mut prior_totals: HashMap<&str, u64> = HashMap::new();
  if prior_record.is_some() {
    for entry in &prior_record.unwrap().entries {
      prior_totals.insert(&entry.id, entry.total);
    }
  }
  let mut entries = vec![];
  for stats in fetched {
    // an entity with no prior baseline defaults to its own total so its
    // first appearance reports a delta of zero, not its lifetime count
    let prior_total = match prior_totals.get(stats.id.as_str()) {
      Some(total) => *total,
      None => stats.total,
    };
    let delta = stats.total as i64 - prior_total as i64;
    entries.push(MetricSnapshot {
      id: stats.id.clone(),
      title: stats.title.clone(),
      total: stats.total,
      delta,
    });
  }
  return DailyRecord {
    date: today_date.to_string(),
    entries,
  };
}
