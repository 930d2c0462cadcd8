/// yt-dlp backed media resolver
use crate::services::video_id;
use async_trait::async_trait;
use relay_core::{MediaResolver, ResolveError, Track};
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    ytdlp_path: PathBuf,
    max_duration_secs: f64,
}

impl YtDlpResolver {
    pub fn new(ytdlp_path: PathBuf, max_duration_secs: u64) -> Self {
        Self {
            ytdlp_path,
            max_duration_secs: max_duration_secs as f64,
        }
    }

    /// Run yt-dlp and return its stdout
    async fn run(&self, args: &[&str]) -> Result<String, ResolveError> {
        let output = Command::new(&self.ytdlp_path)
            .arg("--no-warnings")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolveError::tool(format!("yt-dlp failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl MediaResolver for YtDlpResolver {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::invalid_input("search query is empty"));
        }

        let target = format!("ytsearch{}:{}", limit.max(1), query);
        let stdout = self
            .run(&["--dump-json", "--flat-playlist", &target])
            .await?;

        let tracks = parse_search_output(&stdout, self.max_duration_secs)?;
        tracing::debug!(query, results = tracks.len(), "Search completed");
        Ok(tracks)
    }

    async fn resolve(&self, reference: &str) -> Result<Track, ResolveError> {
        let id = video_id::extract(reference).ok_or_else(|| {
            ResolveError::invalid_input(format!("not a video id or URL: {reference}"))
        })?;

        let stdout = self
            .run(&["--dump-json", "--no-playlist", &video_id::watch_url(&id)])
            .await?;

        let info: Value = serde_json::from_str(stdout.trim())?;
        track_from_info(&info).ok_or(ResolveError::NotFound(id))
    }

    async fn stream_url(&self, track_id: &str) -> Result<String, ResolveError> {
        if !video_id::is_video_id(track_id) {
            return Err(ResolveError::invalid_input(format!(
                "not a video id: {track_id}"
            )));
        }

        let stdout = self
            .run(&[
                "-f",
                "bestaudio",
                "-g",
                "--no-playlist",
                &video_id::watch_url(track_id),
            ])
            .await?;

        stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ResolveError::NotFound(track_id.to_string()))
    }
}

/// Parse `--dump-json` output (one JSON object per line) into tracks,
/// dropping entries longer than `max_duration_secs`
pub fn parse_search_output(stdout: &str, max_duration_secs: f64) -> Result<Vec<Track>, ResolveError> {
    let mut tracks = Vec::new();
    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let info: Value = serde_json::from_str(line)?;
        if let Some(track) = track_from_info(&info) {
            if track.duration <= max_duration_secs {
                tracks.push(track);
            }
        }
    }
    Ok(tracks)
}

/// Build a track from a yt-dlp info object
///
/// Returns `None` when the entry has no usable id.
pub fn track_from_info(info: &Value) -> Option<Track> {
    let id = info.get("id").and_then(Value::as_str)?;
    if !video_id::is_video_id(id) {
        return None;
    }

    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| info.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string()
    };

    let title = text(&["title"]);
    let artist = text(&["artist", "uploader", "channel"]);
    let duration = info.get("duration").and_then(Value::as_f64).unwrap_or(0.0);

    let thumbnail = info
        .get("thumbnail")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            info.get("thumbnails")
                .and_then(Value::as_array)
                .and_then(|thumbs| thumbs.last())
                .and_then(|thumb| thumb.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"));

    Some(Track::new(id, title, artist, duration).with_thumbnail(thumbnail))
}
