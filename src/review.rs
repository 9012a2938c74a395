//! Review record types and extraction from raw API payloads
//!
//! The storefront response is treated as untrusted: every payload field is
//! optional and a missing or oddly-typed value degrades to `None` rather
//! than failing the page. The review id is the sole identity; all other
//! fields are payload and never participate in equality.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One harvested review, flattened for the CSV checkpoint/output schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique review identifier (`recommendationid`), the dedup key
    pub review_id: String,
    pub review_text: Option<String>,
    pub votes_up: Option<u64>,
    pub votes_funny: Option<u64>,
    pub comment_count: Option<u64>,
    pub author_steamid: Option<String>,
    pub author_playtime_forever: Option<u64>,
    pub author_playtime_last_2weeks: Option<u64>,
    pub language: Option<String>,
    /// Unix seconds, as reported upstream
    pub timestamp_created: Option<i64>,
    pub timestamp_updated: Option<i64>,
    pub review_score: Option<f64>,
    pub written_during_early_access: Option<bool>,
}

impl PartialEq for Review {
    fn eq(&self, other: &Self) -> bool {
        self.review_id == other.review_id
    }
}

impl Eq for Review {}

/// One parsed page of the paginated response
#[derive(Debug, Clone)]
pub struct ReviewPage {
    pub entries: Vec<RawEntry>,
    /// Opaque token for the next page; empty means no further pages
    pub cursor: String,
}

/// Raw response body, deserialized leniently
#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    reviews: Vec<RawEntry>,
    #[serde(default)]
    cursor: String,
}

/// One raw review entry as the API returns it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    /// Sometimes a string, sometimes a bare number
    #[serde(default)]
    pub recommendationid: Option<Value>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub votes_up: Option<u64>,
    #[serde(default)]
    pub votes_funny: Option<u64>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timestamp_created: Option<i64>,
    #[serde(default)]
    pub timestamp_updated: Option<i64>,
    /// The API serializes this score as a decimal string
    #[serde(default)]
    pub weighted_vote_score: Option<Value>,
    #[serde(default)]
    pub written_during_early_access: Option<bool>,
}

/// Nested author block of a raw entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub steamid: Option<String>,
    #[serde(default)]
    pub playtime_forever: Option<u64>,
    #[serde(default)]
    pub playtime_last_two_weeks: Option<u64>,
}

impl ReviewPage {
    /// Parses a raw JSON body into a page
    ///
    /// A body without a `reviews` array yields an empty page, which the
    /// pagination loop treats as normal end-of-data.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: RawResponse = serde_json::from_str(body)?;
        Ok(Self {
            entries: raw.reviews,
            cursor: raw.cursor,
        })
    }
}

impl RawEntry {
    /// Extracts the identifier, tolerating string or numeric encodings
    ///
    /// Entries with no usable id cannot be deduplicated and are skipped
    /// by the merge step.
    pub fn id(&self) -> Option<String> {
        match self.recommendationid.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl Review {
    /// Builds a flat record from a raw entry, or None if it has no id
    pub fn from_raw(entry: &RawEntry) -> Option<Self> {
        let review_id = entry.id()?;
        let author = entry.author.as_ref();

        Some(Self {
            review_id,
            review_text: entry.review.clone(),
            votes_up: entry.votes_up,
            votes_funny: entry.votes_funny,
            comment_count: entry.comment_count,
            author_steamid: author.and_then(|a| a.steamid.clone()),
            author_playtime_forever: author.and_then(|a| a.playtime_forever),
            author_playtime_last_2weeks: author.and_then(|a| a.playtime_last_two_weeks),
            language: entry.language.clone(),
            timestamp_created: entry.timestamp_created,
            timestamp_updated: entry.timestamp_updated,
            review_score: entry.weighted_vote_score.as_ref().and_then(score_as_f64),
            written_during_early_access: entry.written_during_early_access,
        })
    }
}

/// The weighted vote score arrives as "0.52..." or occasionally a number
fn score_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
