use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;

/// One catalog entry as returned by the list endpoint. Everything except the
/// id may be missing on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub id: i64,
    pub name: Option<String>,
    pub released: Option<String>,
    pub background_image: Option<String>,
    pub metacritic: Option<i32>,
    pub genres: Vec<String>,
}

/// Full record for one catalog entry, fetched from the detail endpoint and
/// keyed by the matching summary's id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetail {
    pub id: i64,
    pub name: String,
    pub metacritic: Option<i32>,
    pub background_image: String,
    pub website: Option<String>,
    pub developers: Vec<String>,
    pub genres: Vec<String>,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct NameTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    id: i64,
    name: Option<String>,
    released: Option<String>,
    background_image: Option<String>,
    metacritic: Option<i32>,
    #[serde(default)]
    genres: Vec<NameTag>,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    id: i64,
    name: String,
    metacritic: Option<i32>,
    background_image: String,
    website: Option<String>,
    developers: Vec<NameTag>,
    genres: Vec<NameTag>,
    description_raw: String,
}

fn names(tags: Vec<NameTag>) -> Vec<String> {
    tags.into_iter().map(|tag| tag.name).collect()
}

impl From<RawSummary> for GameSummary {
    fn from(raw: RawSummary) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            released: raw.released,
            background_image: raw.background_image,
            metacritic: raw.metacritic,
            genres: names(raw.genres),
        }
    }
}

impl From<RawDetail> for GameDetail {
    fn from(raw: RawDetail) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            metacritic: raw.metacritic,
            background_image: raw.background_image,
            website: raw.website,
            developers: names(raw.developers),
            genres: names(raw.genres),
            description: raw.description_raw,
        }
    }
}

/// Decode a list response. The envelope must parse; individual entries that
/// fail to decode are logged and skipped so one bad item cannot sink the page.
pub fn decode_list(bytes: &[u8]) -> Result<Vec<GameSummary>> {
    let envelope: ListEnvelope = serde_json::from_slice(bytes)?;

    let mut summaries = Vec::with_capacity(envelope.results.len());
    for item in envelope.results {
        match serde_json::from_value::<RawSummary>(item) {
            Ok(raw) => summaries.push(GameSummary::from(raw)),
            Err(err) => tracing::warn!("skipping undecodable list entry: {}", err),
        }
    }
    Ok(summaries)
}

/// Decode a detail response. Required fields (id, name, background_image,
/// developers, genres, description_raw) are never defaulted.
pub fn decode_detail(bytes: &[u8]) -> Result<GameDetail> {
    let raw: RawDetail = serde_json::from_slice(bytes)?;
    Ok(raw.into())
}
