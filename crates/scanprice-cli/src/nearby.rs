//! One-shot `nearby` listing.

use scanprice_core::{Coordinate, SupermarketCandidate, SEARCH_RADIUS_METERS};
use scanprice_overpass::OverpassClient;
use serde::Serialize;

use crate::view;

#[derive(Debug, Serialize)]
pub(crate) struct NearbyRow {
    pub osm_id: Option<i64>,
    pub label: String,
    pub distance_m: Option<f64>,
}

pub(crate) fn nearby_rows(at: &Coordinate, candidates: &[SupermarketCandidate]) -> Vec<NearbyRow> {
    candidates
        .iter()
        .map(|c| NearbyRow {
            osm_id: c.osm_id,
            label: c.label().to_string(),
            distance_m: c.distance_from(at).map(f64::round),
        })
        .collect()
}

/// Prints supermarkets within the search radius of `at`.
///
/// # Errors
///
/// Returns an error if the Overpass request fails or JSON output cannot be
/// serialized.
pub(crate) async fn run_nearby(
    client: &OverpassClient,
    at: Coordinate,
    json: bool,
) -> anyhow::Result<()> {
    let candidates = client.supermarkets_near(at, SEARCH_RADIUS_METERS).await?;
    let rows = nearby_rows(&at, &candidates);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", view::NONE_FOUND);
        return Ok(());
    }

    println!("{}", view::found(rows.len()));
    for row in &rows {
        match row.distance_m {
            Some(d) => println!("  {} ({d:.0} m)", row.label),
            None => println!("  {}", row.label),
        }
    }
    Ok(())
}
