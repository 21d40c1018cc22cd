use chrono_tz::Asia::Tokyo;
use common::history::HistoryFile;

fn build_video_id_list() -> Vec<String> {
  // comma-separated override, otherwise the Agust D upload list
  let video_ids_override = std::env::var("VIDEO_IDS");
  if video_ids_override.is_ok() {
    return video_ids_override
      .unwrap()
      .split(',')
      .map(|video_id| video_id.trim().to_string())
      .filter(|video_id| video_id.is_empty() == false)
      .collect();
  }
  return vec![
    String::from("iy9qZR_OGa0"), // Haegeum
    String::from("uVD-YgzDzyY"), // People Pt.2
    String::from("IX1dkYoLHVs"), // AMYGDALA
    String::from("qGjAWJ2zWWI"), // Daechwita
    String::from("_Zgc12yL5ss"), // Give It To Me
    String::from("3Y_Eiyg4bfk"), // Agust D
    String::from("PV1gCvzpSy0"), // Interlude : Shadow
  ];
}

fn main() {
  // load env vars
  dotenv::dotenv().ok();
  // logger
  simple_logger::SimpleLogger::new().env().init().unwrap();
  // runtime
  let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
  // run
  rt.block_on(async {
    // config
    let youtube_api_key = std::env::var("YOUTUBE_API_KEY");
    if youtube_api_key.is_err() {
      panic!("YOUTUBE_API_KEY is not set");
    }
    let youtube_api_key = youtube_api_key.unwrap();
    let video_ids = build_video_id_list();
    let history_path = "./data/video_views.json";
    let timezone = Tokyo;
    // load history before spending quota on the api
    let history_file = HistoryFile::new(history_path);
    let result = history_file.load().await;
    if result.is_err() {
      panic!("failed to load history: {:?}", result);
    }
    let history = result.unwrap();
    // get view counts from youtube
    let youtube = providers::youtube::YouTube::new(&youtube_api_key);
    let result = youtube.get_video_stats(&video_ids).await;
    if result.is_err() {
      panic!("failed to get video stats: {:?}", result);
    }
    let fetched = result.unwrap();
    if fetched.len() == 0 {
      panic!("no videos returned");
    }
    // reconcile against yesterday
    let today_date = common::dates::today_string(&timezone);
    let daily_record = common::reconcile::build_daily_record(&today_date, &fetched, &history);
    for entry in &daily_record.entries {
      log::info!("{}: total = {} delta = {}", entry.title, entry.total, entry.delta);
    }
    // save
    let result = history_file.save(daily_record, history).await;
    if result.is_err() {
      panic!("failed to save history: {:?}", result);
    }
    let history = result.unwrap();
    log::info!("wrote {} day(s) of history to {}", history.len(), history_path);
  });
}
