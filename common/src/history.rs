use std::io::ErrorKind;

use crate::file;
use crate::structs::DailyRecord;

pub const RETENTION_DAYS: usize = 7;

#[derive(Debug)]
pub enum HistoryError {
  Io(std::io::Error),
  // the file existed but did not parse; never coalesced to an empty
  // history, resetting is an explicit operator action
  Corrupt(serde_json::Error),
}

impl std::fmt::Display for HistoryError {
  fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      HistoryError::Io(error) => {
        return write!(formatter, "failed to read or write history file: {}", error);
      }
      HistoryError::Corrupt(error) => {
        return write!(formatter, "history file is corrupt: {}", error);
      }
    }
  }
}

impl std::error::Error for HistoryError {}

// rolling window of daily records, oldest first, persisted as one JSON
// document; a missing file is an empty baseline, not an error. nothing here
// locks the file: a single serialized scheduler trigger is a precondition
pub struct HistoryFile {
  path: String,
}

impl HistoryFile {
  pub fn new(path: &str) -> HistoryFile {
    return HistoryFile { path: path.to_string() };
  }

  pub async fn load(&self) -> Result<Vec<DailyRecord>, HistoryError> {
    let result = tokio::fs::read_to_string(&self.path).await;
    if result.is_err() {
      let error = result.err().unwrap();
      if error.kind() == ErrorKind::NotFound {
        return Ok(vec![]);
      }
      return Err(HistoryError::Io(error));
    }
    let contents = result.unwrap();
    let parsed = serde_json::from_str::<Vec<DailyRecord>>(&contents);
    if parsed.is_err() {
      return Err(HistoryError::Corrupt(parsed.err().unwrap()));
    }
    return Ok(parsed.unwrap());
  }

  pub async fn save(&self, new_record: DailyRecord, mut history: Vec<DailyRecord>) -> Result<Vec<DailyRecord>, HistoryError> {
    merge_record(&mut history, new_record);
    let result = file::write_json_to_file(&self.path, &history).await;
    if result.is_err() {
      return Err(HistoryError::Io(result.err().unwrap()));
    }
    return Ok(history);
  }
}

// a re-run on the same calendar day replaces the day's record instead of
// growing the window; afterwards only the most recent RETENTION_DAYS survive
pub fn merge_record(history: &mut Vec<DailyRecord>, new_record: DailyRecord) {
  let is_same_day = match history.last() {
    Some(last_record) => last_record.date == new_record.date,
    None => false,
  };
  if is_same_day {
    let last_index = history.len() - 1;
    history[last_index] = new_record;
  } else {
    history.push(new_record);
  }
  if history.len() > RETENTION_DAYS {
    let excess = history.len() - RETENTION_DAYS;
    history.drain(0..excess);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::structs::MetricSnapshot;

  fn record(date: &str, total: u64) -> DailyRecord {
    return DailyRecord {
      date: date.to_string(),
      entries: vec![MetricSnapshot {
        id: String::from("A"),
        title: String::from("a title"),
        total,
        delta: 0,
      }],
    };
  }

  #[test]
  fn appends_a_new_day() {
    let mut history = vec![record("2024-01-01", 100)];
    merge_record(&mut history, record("2024-01-02", 150));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date, "2024-01-01");
    assert_eq!(history[1].date, "2024-01-02");
  }

  #[test]
  fn replaces_the_most_recent_record_on_a_same_day_rerun() {
    let mut history = vec![record("2024-01-01", 100), record("2024-01-02", 150)];
    merge_record(&mut history, record("2024-01-02", 160));
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].entries[0].total, 160);
  }

  #[test]
  fn merging_the_same_record_twice_leaves_history_unchanged() {
    let mut history = vec![record("2024-01-01", 100)];
    merge_record(&mut history, record("2024-01-02", 150));
    let after_first = history.clone();
    merge_record(&mut history, record("2024-01-02", 150));
    assert_eq!(history, after_first);
  }

  #[test]
  fn keeps_only_the_most_recent_retention_days() {
    let mut history = vec![];
    for day in 1..=20 {
      merge_record(&mut history, record(&format!("2024-01-{:02}", day), day as u64));
    }
    assert_eq!(history.len(), RETENTION_DAYS);
    let dates: Vec<&str> = history.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec![
      "2024-01-14", "2024-01-15", "2024-01-16", "2024-01-17", "2024-01-18", "2024-01-19", "2024-01-20",
    ]);
  }

  #[tokio::test]
  async fn load_returns_an_empty_history_for_a_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("missing.json");
    let history_file = HistoryFile::new(path.to_str().unwrap());
    let history = history_file.load().await.unwrap();
    assert_eq!(history.len(), 0);
  }

  #[tokio::test]
  async fn load_surfaces_a_corrupt_file_instead_of_resetting() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("corrupt.json");
    tokio::fs::write(&path, "{ not json ]").await.unwrap();
    let history_file = HistoryFile::new(path.to_str().unwrap());
    let result = history_file.load().await;
    assert!(matches!(result, Err(HistoryError::Corrupt(_))));
  }

  #[tokio::test]
  async fn save_then_load_round_trips() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("history.json");
    let history_file = HistoryFile::new(path.to_str().unwrap());
    let history = history_file.load().await.unwrap();
    let history = history_file.save(record("2024-01-01", 100), history).await.unwrap();
    let history = history_file.save(record("2024-01-02", 150), history).await.unwrap();
    assert_eq!(history.len(), 2);
    let reloaded = history_file.load().await.unwrap();
    assert_eq!(reloaded, history);
  }

  #[tokio::test]
  async fn saving_the_same_day_twice_does_not_grow_the_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("history.json");
    let history_file = HistoryFile::new(path.to_str().unwrap());
    let history = history_file.load().await.unwrap();
    let history = history_file.save(record("2024-01-02", 150), history).await.unwrap();
    let first_contents = tokio::fs::read_to_string(&path).await.unwrap();
    let history = history_file.save(record("2024-01-02", 150), history).await.unwrap();
    let second_contents = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(first_contents, second_contents);
  }
}
