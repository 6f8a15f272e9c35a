//! Trending-video fetcher for the YouTube Data API v3.

use std::{collections::HashSet, path::PathBuf};

use serde::Deserialize;

use crate::{
    config::{ApiKey, PipelineConfig},
    dataset::{raw_file_name, write_raw},
    error::{Result, TrendlexError},
    types::VideoRecord,
};

/// One page of `videos.list` results
#[derive(Debug, Clone, Default)]
pub struct VideosPage {
    pub records: Vec<VideoRecord>,
    pub next_page_token: Option<String>,
}

/// Anything that can serve trending pages for a region
pub trait TrendingSource {
    async fn fetch_page(
        &self,
        region: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<VideosPage>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: String,
    description: String,
    tags: Vec<String>,
    category_id: String,
    published_at: String,
}

// Counters arrive as decimal strings and are omitted when hidden.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn parse_count(field: &str, value: Option<&str>) -> Result<u64> {
    match value {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| TrendlexError::MalformedResponse {
                reason: format!("{field} is not a count: {raw:?}"),
            }),
    }
}

/// Decode a `videos.list` body into records tagged with `region`
pub fn parse_video_list(body: &str, region: &str) -> Result<VideosPage> {
    let response: VideoListResponse =
        serde_json::from_str(body).map_err(|e| TrendlexError::MalformedResponse {
            reason: e.to_string(),
        })?;

    let records = response
        .items
        .into_iter()
        .map(|item| {
            Ok(VideoRecord {
                video_id: item.id,
                title: item.snippet.title,
                description: item.snippet.description,
                tags: item.snippet.tags.join(" "),
                category_id: item.snippet.category_id,
                published_at: item.snippet.published_at,
                view_count: parse_count("viewCount", item.statistics.view_count.as_deref())?,
                like_count: parse_count("likeCount", item.statistics.like_count.as_deref())?,
                comment_count: parse_count(
                    "commentCount",
                    item.statistics.comment_count.as_deref(),
                )?,
                region: region.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(VideosPage {
        records,
        next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    })
}

pub struct YouTubeClient {
    client: reqwest::Client,
    api_url: String,
    api_key: ApiKey,
}

impl YouTubeClient {
    pub fn new(api_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

/// Non-success response, preferring the message of a JSON error body
pub fn api_status_error(status: u16, body: String) -> TrendlexError {
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    TrendlexError::ApiStatus { status, message }
}

impl TrendingSource for YouTubeClient {
    async fn fetch_page(
        &self,
        region: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<VideosPage> {
        let max_results = page_size.to_string();
        let mut query = vec![
            ("part", "snippet,statistics"),
            ("chart", "mostPopular"),
            ("regionCode", region),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        log::debug!("GET videos region={region} page_token={page_token:?}");
        let response = self
            .client
            .get(format!("{}/videos", self.api_url))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_status_error(status.as_u16(), body));
        }

        parse_video_list(&body, region)
    }
}

/// Follow continuation tokens until `target` records or the last page
pub async fn collect_region<S: TrendingSource>(
    source: &S,
    region: &str,
    target: usize,
    page_size: u32,
) -> Result<Vec<VideoRecord>> {
    let mut records = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = source
            .fetch_page(region, page_token.as_deref(), page_size)
            .await?;
        let page_len = page.records.len();
        records.extend(page.records);
        log::info!("{region}: {} videos so far", records.len());

        if records.len() >= target || page_len == 0 {
            break;
        }
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    records.truncate(target);
    Ok(records)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchSummary {
    pub per_region: Vec<(String, usize)>,
    pub duplicates_dropped: usize,
    pub unique: usize,
    pub kept: usize,
}

/// Keep the first record seen for every video id
pub fn dedup_by_id(records: Vec<VideoRecord>) -> (Vec<VideoRecord>, usize) {
    let mut seen = HashSet::new();
    let before = records.len();
    let unique: Vec<VideoRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.video_id.clone()))
        .collect();
    let dropped = before - unique.len();
    (unique, dropped)
}

/// Fetch every configured region, de-duplicate, then keep one category.
pub async fn fetch_trending<S: TrendingSource>(
    source: &S,
    cfg: &PipelineConfig,
) -> Result<(Vec<VideoRecord>, FetchSummary)> {
    let mut combined = Vec::new();
    let mut per_region = Vec::new();

    for region in &cfg.fetch.regions {
        let records = collect_region(
            source,
            region,
            cfg.fetch.per_region_target,
            cfg.fetch.page_size,
        )
        .await?;
        per_region.push((region.clone(), records.len()));
        combined.extend(records);
    }

    let (unique, duplicates_dropped) = dedup_by_id(combined);
    let unique_count = unique.len();

    let kept: Vec<VideoRecord> = unique
        .into_iter()
        .filter(|r| r.category_id == cfg.category_id)
        .collect();

    let summary = FetchSummary {
        per_region,
        duplicates_dropped,
        unique: unique_count,
        kept: kept.len(),
    };
    Ok((kept, summary))
}

/// Fetch from the live API and write a timestamped raw CSV
pub async fn run_fetch(cfg: &PipelineConfig, api_key: ApiKey) -> Result<(PathBuf, FetchSummary)> {
    cfg.validate()?;

    let client = YouTubeClient::new(cfg.fetch.api_url.clone(), api_key);
    let (records, summary) = fetch_trending(&client, cfg).await?;

    let out_path = cfg
        .paths
        .raw_dir
        .join(raw_file_name(&cfg.fetch.regions, &chrono::Local::now()));
    tokio::fs::create_dir_all(&cfg.paths.raw_dir).await?;
    write_raw(&out_path, &records)?;

    log::info!(
        "saved {} videos (category {}) to {}",
        records.len(),
        cfg.category_id,
        out_path.display()
    );
    Ok((out_path, summary))
}
