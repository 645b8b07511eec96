//! IGDB query-language builders

/// Field selection shared by every games query
pub const GAME_FIELDS: &str =
    "fields name, slug, summary, first_release_date, cover.url, platforms.name, genres.name;";

/// Main games only (no DLC, bundles or editions)
const MAIN_GAME_FILTER: &str = "game_type = 0";

/// Free-text search, optionally restricted by platform name suffix
pub fn search_query(term: &str, platform: Option<&str>, limit: u32) -> String {
    let mut query = format!(
        "{} search \"{}\"; where {}",
        GAME_FIELDS,
        escape(term),
        MAIN_GAME_FILTER
    );

    if let Some(platform) = platform.map(str::trim).filter(|p| !p.is_empty()) {
        query.push_str(&format!(" & platforms.name ~ *\"{}\"", escape(platform)));
    }

    query.push_str(&format!("; limit {};", limit));
    query
}

/// Lookup of a single game
pub fn by_id_query(id: i64) -> String {
    format!("{} where id = {};", GAME_FIELDS, id)
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
