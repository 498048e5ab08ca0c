// YouTube Data API implementation of VideoSource
use crate::application::video_source::VideoSource;
use crate::domain::video::{RawVideoRecord, parse_video_list};
use crate::infrastructure::config::YouTubeSettings;
use crate::infrastructure::response_shape::write_shape;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

const PAGE_SIZE: &str = "50";
const VIDEO_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct YouTubeRepository {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    debug_shape_path: Option<PathBuf>,
}

impl YouTubeRepository {
    pub fn new(settings: &YouTubeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            debug_shape_path: settings.debug_shape_path.as_ref().map(PathBuf::from),
        })
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let query: Vec<String> = params
            .iter()
            .chain(std::iter::once(&("key", self.api_key.as_str())))
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("{}/{}?{}", self.api_base, endpoint, query.join("&"))
    }

    async fn request_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.build_url(endpoint, params);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} request failed with status {}: {}", endpoint, status, body);
        }

        response
            .json::<Value>()
            .await
            .with_context(|| format!("Failed to parse {} response", endpoint))
    }

    /// Resolve an `@handle` to a channel id. Raw ids, and handles that fail
    /// to resolve, are returned unchanged.
    async fn resolve_channel_id(&self, channel: &str) -> String {
        let Some(handle) = channel.strip_prefix('@') else {
            return channel.to_string();
        };

        match self
            .request_json("channels", &[("part", "id"), ("forHandle", handle)])
            .await
        {
            Ok(data) => first_item_id(&data).unwrap_or_else(|| channel.to_string()),
            Err(e) => {
                tracing::warn!("Could not resolve handle {}: {:#}", channel, e);
                channel.to_string()
            }
        }
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>> {
        let data = self
            .request_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;
        Ok(uploads_playlist(&data))
    }

    async fn all_video_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("part", "snippet,contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let page = self.request_json("playlistItems", &params).await?;
            let (ids, next) = page_video_ids(&page);
            video_ids.extend(ids);

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(video_ids)
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<Value>> {
        let mut all_video_data = Vec::new();
        for chunk in video_ids.chunks(VIDEO_BATCH_SIZE) {
            let ids = chunk.join(",");
            let data = self
                .request_json(
                    "videos",
                    &[("part", "snippet,contentDetails,statistics"), ("id", ids.as_str())],
                )
                .await?;
            if let Some(Value::Array(items)) = data.get("items") {
                all_video_data.extend(items.iter().cloned());
            }
        }
        Ok(all_video_data)
    }
}

#[async_trait]
impl VideoSource for YouTubeRepository {
    async fn fetch_channel_videos(&self, channel: &str) -> Result<Vec<RawVideoRecord>> {
        if !self.is_configured() {
            tracing::warn!("No API key configured; returning no videos for {}", channel);
            return Ok(Vec::new());
        }

        let channel_id = self.resolve_channel_id(channel).await;
        let Some(playlist_id) = self.uploads_playlist_id(&channel_id).await? else {
            tracing::warn!("No uploads playlist for channel {}", channel_id);
            return Ok(Vec::new());
        };

        let video_ids = self.all_video_ids(&playlist_id).await?;
        tracing::debug!("Found {} uploads for channel {}", video_ids.len(), channel_id);

        let items = Value::Array(self.video_details(&video_ids).await?);

        if let Some(path) = &self.debug_shape_path {
            if let Err(e) = write_shape(&items, path).await {
                tracing::warn!("Failed to write response shape to {}: {:#}", path.display(), e);
            }
        }

        Ok(parse_video_list(items))
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn first_item_id(data: &Value) -> Option<String> {
    data.get("items")?.get(0)?.get("id")?.as_str().map(str::to_string)
}

fn uploads_playlist(data: &Value) -> Option<String> {
    data.get("items")?
        .get(0)?
        .get("contentDetails")?
        .get("relatedPlaylists")?
        .get("uploads")?
        .as_str()
        .map(str::to_string)
}

/// Video ids on one playlist page, plus the next page token if any
fn page_video_ids(page: &Value) -> (Vec<String>, Option<String>) {
    let ids = page
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("contentDetails")?.get("videoId")?.as_str())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let next = page
        .get("nextPageToken")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    (ids, next)
}
