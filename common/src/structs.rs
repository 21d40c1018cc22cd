use serde::{Deserialize, Serialize};

// what a fetcher reports for one entity, in upstream response order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EntityStats {
  pub id: String,
  pub title: String,
  pub total: u64,
}

// one entity inside a persisted day; delta is against the previous calendar
// day and goes negative when upstream corrects a count downward
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetricSnapshot {
  pub id: String,
  pub title: String,
  pub total: u64,
  pub delta: i64,
}

// date is the business key: persisted history holds at most one record per date
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DailyRecord {
  pub date: String,
  pub entries: Vec<MetricSnapshot>,
}
