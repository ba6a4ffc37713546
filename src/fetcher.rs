use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::LazyLock;

use crate::classify::classify;
use crate::error::HnJobsError;
use crate::models::Job;

pub const ALGOLIA_API: &str = "https://hn.algolia.com/api/v1";
const HIRING_QUERY: &str = "Who is hiring?";
const HIRING_TAGS: &str = "story,author_whoishiring";

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|nbsp);").expect("valid entity pattern")
});
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br pattern"));
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+(?:[^>]*?\s+)?href="([^"]*)"[^>]*>(.*?)</a>"#).expect("valid anchor pattern")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static LINK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[link\]\((.*?)\)").expect("valid link marker pattern"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<StoryHit>,
}

#[derive(Debug, Deserialize)]
struct StoryHit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    created_at: DateTime<Utc>,
}

/// The newest monthly hiring story.
#[derive(Debug, Clone, PartialEq)]
pub struct HiringThread {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Item ids come back as numbers from `/items` and as strings from search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// One node of an `/items/{id}` tree.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemNode {
    #[serde(alias = "objectID")]
    pub id: ItemId,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "comment_text")]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<ItemNode>>,
}

pub struct HnClient {
    client: reqwest::Client,
    base_url: String,
}

impl HnClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hn-jobs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Looks up the most recent hiring story, newest first.
    pub async fn latest_hiring_thread(&self) -> Result<HiringThread> {
        let response: SearchResponse = self
            .get_json(
                "search_by_date",
                &[("tags", HIRING_TAGS), ("query", HIRING_QUERY), ("hitsPerPage", "1")],
            )
            .await?;

        let hit = response
            .hits
            .into_iter()
            .next()
            .ok_or(HnJobsError::NoThreadFound)?;

        Ok(HiringThread {
            id: hit.object_id,
            title: hit.title.unwrap_or_else(|| "Unknown Title".to_string()),
            created_at: hit.created_at,
        })
    }

    pub async fn thread_item(&self, id: &str) -> Result<ItemNode> {
        self.get_json(&format!("items/{}", id), &[]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "requesting");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%url, %status, "API request failed");
            return Err(HnJobsError::Api { endpoint: url, status }.into());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

/// Finds the newest thread and converts its top-level comments into jobs.
pub async fn fetch_latest_jobs(client: &HnClient) -> Result<(HiringThread, Vec<Job>)> {
    let thread = client.latest_hiring_thread().await?;
    println!(
        "Found: {} ({})",
        thread.title,
        thread.created_at.format("%a %b %d %Y")
    );

    println!("Fetching jobs from Algolia...");
    let root = client.thread_item(&thread.id).await?;
    let jobs = jobs_from_item(&root, Utc::now());
    tracing::info!(thread = %thread.id, count = jobs.len(), "parsed thread postings");
    Ok((thread, jobs))
}

/// Builds jobs from the direct children of a story. Replies are not visited.
pub fn jobs_from_item(root: &ItemNode, now: DateTime<Utc>) -> Vec<Job> {
    root.children
        .iter()
        .flatten()
        .filter_map(|comment| job_from_comment(comment, now))
        .collect()
}

pub fn job_from_comment(comment: &ItemNode, now: DateTime<Utc>) -> Option<Job> {
    let raw = comment.text.as_deref().filter(|t| !t.is_empty())?;
    let cleaned = html_to_text(raw);

    let lines: Vec<&str> = cleaned.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let (&header, rest) = lines.split_first()?;

    let content = rest.join("\n").trim().to_string();
    let flags = classify(header);

    Some(Job {
        id: comment.id.to_string(),
        user: comment.author.clone().unwrap_or_else(|| "Unknown".to_string()),
        age: comment
            .created_at
            .map(|created| format_age(created, now))
            .unwrap_or_else(|| "Unknown".to_string()),
        header: header.to_string(),
        company: company_from_comment_header(header),
        location: "Unknown".to_string(),
        url: LINK_MARKER.captures(header).map(|c| c[1].to_string()),
        content: if content.is_empty() { header.to_string() } else { content },
        is_us_only: flags.is_us_only,
        is_remote: flags.is_remote,
        is_visa: flags.is_visa,
        source_line: 0,
    })
}

/// Company from an API header: first `|` segment, then first `-` segment.
pub fn company_from_comment_header(header: &str) -> String {
    let first = header.split('|').next().unwrap_or_default();
    let company = first.split('-').next().unwrap_or_default().trim();
    if company.is_empty() || company.chars().count() > 50 {
        "Unknown".to_string()
    } else {
        company.to_string()
    }
}

/// Converts comment HTML into plain lines, keeping links as `[link](URL)TEXT`.
pub fn html_to_text(html: &str) -> String {
    let decoded = decode_entities(html);
    let text = decoded.replace("<p>", "\n\n").replace("</p>", "");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = ANCHOR.replace_all(&text, "[link](${1})${2}");
    let text = TAG.replace_all(&text, "");
    text.trim().to_string()
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => {
                    let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => name[1..].parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

pub fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created).num_hours().max(0);
    if hours < 24 {
        format!("{} hours ago", hours)
    } else {
        format!("{} days ago", hours / 24)
    }
}
