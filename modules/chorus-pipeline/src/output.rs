use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chorus_common::{NormalizedTweet, PipelineError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a JSON document. A missing file is reported as
/// [`PipelineError::MissingInput`] so callers can fail before doing any work.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write pretty-printed UTF-8 JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

/// CSV columns, in [`NormalizedTweet`] field order.
pub const CSV_HEADER: [&str; 13] = [
    "id",
    "url",
    "username",
    "display_name",
    "group",
    "label",
    "text",
    "created_at",
    "likes",
    "retweets",
    "replies",
    "quotes",
    "virality_score",
];

/// Write the dataset as CSV: a header row, then one row per tweet.
/// The header is written even when there are no tweets.
pub fn write_csv(path: &Path, tweets: &[NormalizedTweet]) -> Result<(), PipelineError> {
    let file = create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| PipelineError::Csv(e.to_string()))?;
    for tweet in tweets {
        writer
            .serialize(tweet)
            .map_err(|e| PipelineError::Csv(e.to_string()))?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

fn create(path: &Path) -> Result<File, PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    File::create(path).map_err(|e| PipelineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedTweet {
        NormalizedTweet {
            id: "1".into(),
            url: "https://x.com/AyOdeh/status/1".into(),
            username: "AyOdeh".into(),
            display_name: "Ayman Odeh".into(),
            group: "Hadash-Ta'al".into(),
            label: "Ayman Odeh".into(),
            text: "hello, \"world\"\nsecond line".into(),
            created_at: "2021-04-29 17:09:14".into(),
            likes: 1,
            retweets: 2,
            replies: 3,
            quotes: 4,
            virality_score: 10,
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_tweet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("all_tweets.csv");
        write_csv(&path, &[sample(), sample()]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_HEADER);

        let rows: Vec<NormalizedTweet> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], sample());
    }

    #[test]
    fn json_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_tweets.json");
        write_json(&path, &vec![sample()]).unwrap();

        let back: Vec<NormalizedTweet> = read_json(&path).unwrap();
        assert_eq!(back, vec![sample()]);
    }

    #[test]
    fn empty_dataset_still_gets_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_tweets.csv");
        write_csv(&path, &[]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim_end(), CSV_HEADER.join(","));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_final_write_is_an_error() {
        let result = write_json(Path::new("/dev/full"), &vec!["x"; 3]);
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<Vec<NormalizedTweet>>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput { .. }));
    }
}
