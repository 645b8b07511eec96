//! Catalog records and the IGDB response shape

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

/// A game as served to clients and cached in the library database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// RFC 3339 timestamp of the first release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl CatalogItem {
    /// Create a record with only the required fields set
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: None,
            summary: None,
            release_date: None,
            cover_url: None,
            platforms: Vec::new(),
            genres: Vec::new(),
        }
    }
}

/// Game object returned by the IGDB `games` endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct IgdbGame {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    /// Unix seconds
    pub first_release_date: Option<i64>,
    pub cover: Option<IgdbCover>,
    pub platforms: Option<Vec<IgdbNamed>>,
    pub genres: Option<Vec<IgdbNamed>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IgdbCover {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IgdbNamed {
    pub name: Option<String>,
}

impl From<IgdbGame> for CatalogItem {
    fn from(game: IgdbGame) -> Self {
        Self {
            id: game.id,
            name: game.name,
            slug: game.slug,
            summary: game.summary,
            release_date: game.first_release_date.and_then(release_timestamp),
            cover_url: game.cover.and_then(|c| c.url).map(|url| cover_url(&url)),
            platforms: names(game.platforms),
            genres: names(game.genres),
        }
    }
}

fn release_timestamp(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// IGDB hands out protocol-relative thumbnail URLs
fn cover_url(url: &str) -> String {
    let big = url.replacen("t_thumb", "t_cover_big", 1);
    if big.starts_with("//") {
        format!("https:{}", big)
    } else {
        big
    }
}

fn names(list: Option<Vec<IgdbNamed>>) -> Vec<String> {
    list.unwrap_or_default()
        .into_iter()
        .filter_map(|n| n.name)
        .collect()
}
