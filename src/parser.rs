use regex::Regex;
use std::sync::LazyLock;

use crate::classify::classify;
use crate::models::Job;

/// Title block emitted at the top of a thread dump; never a posting.
pub const BANNER: &str = "Hacker News: Who is Hiring?";

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)\]]+").expect("valid url pattern"));

/// Attribution lines can precede the posting they describe, so they carry
/// over into later blocks until a new value overwrites them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarriedMeta {
    pub user: String,
    pub age: String,
}

enum LineKind<'a> {
    Author(&'a str),
    Age(String),
    Tally,
    Text,
}

fn line_kind(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("## ") {
        return LineKind::Author(rest.split(". Posted by ").nth(1).unwrap_or("Unknown"));
    }
    if line.starts_with('*') && line.ends_with('*') {
        return LineKind::Age(line.replace('*', "").trim().to_string());
    }
    if line.starts_with("Total postings") {
        return LineKind::Tally;
    }
    LineKind::Text
}

/// Extracts every posting from a markdown thread dump.
pub fn parse_jobs_output(markdown: &str) -> Vec<Job> {
    let mut meta = CarriedMeta::default();
    let jobs: Vec<Job> = split_blocks(markdown)
        .iter()
        .enumerate()
        .filter_map(|(index, block)| parse_block(index, block, &mut meta))
        .collect();

    tracing::info!(count = jobs.len(), "parsed markdown postings");
    jobs
}

/// Splits on lines consisting of exactly `---`.
pub fn split_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        if line == "---" {
            blocks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    blocks.push(current.join("\n"));
    blocks
}

/// Builds one job from a block, updating `meta` with any attribution lines seen.
///
/// Returns `None` for empty blocks, the banner block, and blocks without a header line.
pub fn parse_block(index: usize, block: &str, meta: &mut CarriedMeta) -> Option<Job> {
    if block.trim().is_empty() || block.contains(BANNER) {
        return None;
    }

    let lines: Vec<&str> = block.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut header: Option<&str> = None;
    let mut body: Vec<&str> = Vec::new();
    let mut url: Option<String> = None;

    for &line in &lines {
        if url.is_none() {
            url = URL.find(line).map(|m| m.as_str().to_string());
        }

        match line_kind(line) {
            LineKind::Author(user) => meta.user = user.to_string(),
            LineKind::Age(age) => meta.age = age,
            LineKind::Tally => {}
            LineKind::Text => match header {
                None => header = Some(line),
                Some(h) if h == line => {}
                Some(_) => body.push(line),
            },
        }
    }

    let Some(header) = header else {
        tracing::debug!(index, "dropping block without a header line");
        return None;
    };

    let content = body.join("\n").trim().to_string();
    let flags = classify(header);

    Some(Job {
        id: index.to_string(),
        user: meta.user.clone(),
        age: meta.age.clone(),
        header: header.to_string(),
        company: company_from_header(header),
        location: "Unknown".to_string(),
        url,
        content: if content.is_empty() { header.to_string() } else { content },
        is_us_only: flags.is_us_only,
        is_remote: flags.is_remote,
        is_visa: flags.is_visa,
        source_line: 0,
    })
}

/// Best-effort company name from a markdown header.
///
/// Long results are kept as-is; only the "N point by" banner artifact is replaced.
pub fn company_from_header(header: &str) -> String {
    let company = if let Some((first, _)) = header.split_once('|') {
        first.trim()
    } else if header.contains(" - ") && header.chars().count() < 100 {
        header.split_once(" - ").map_or(header, |(first, _)| first).trim()
    } else {
        header
    };

    let company = company.split_once('[').map_or(company, |(first, _)| first).trim();
    let company = company
        .trim_end_matches(|c| matches!(c, '(' | '-' | '[' | ','))
        .trim();

    if company.is_empty() || company.contains("point by") {
        "Unknown".to_string()
    } else {
        company.to_string()
    }
}
