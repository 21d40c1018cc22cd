use std::path::Path;

use tokio::io::AsyncWriteExt;

// full rewrite through a sibling temp file + rename so a concurrent reader
// never observes a partially written document
pub async fn write_json_to_file<T>(filename: &str, value: &T) -> Result<(), std::io::Error>
where
  T: serde::Serialize,
{
  let stringified_value = serde_json::to_string_pretty(value).unwrap();
  let parent = Path::new(filename).parent();
  if parent.is_some() {
    tokio::fs::create_dir_all(parent.unwrap()).await?;
  }
  let temp_filename = format!("{}.tmp", filename);
  let mut file = tokio::fs::File::create(&temp_filename).await?;
  file.write_all(stringified_value.as_bytes()).await?;
  file.flush().await?;
  tokio::fs::rename(&temp_filename, filename).await?;
  return Ok(());
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn writes_readable_json_and_leaves_no_temp_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("out.json");
    let filename = path.to_str().unwrap();
    write_json_to_file(filename, &vec![1, 2, 3]).await.unwrap();
    let contents = tokio::fs::read_to_string(filename).await.unwrap();
    let parsed: Vec<i64> = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed, vec![1, 2, 3]);
    assert!(tokio::fs::metadata(format!("{}.tmp", filename)).await.is_err());
  }

  #[tokio::test]
  async fn creates_missing_parent_directories() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("data").join("out.json");
    let filename = path.to_str().unwrap();
    write_json_to_file(filename, &String::from("ok")).await.unwrap();
    assert!(tokio::fs::metadata(filename).await.is_ok());
  }
}
