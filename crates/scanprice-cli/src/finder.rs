//! Nearby-supermarket search capability.

use scanprice_core::{Coordinate, SupermarketCandidate};
use scanprice_overpass::{OverpassClient, OverpassError};

/// One request/response cycle against a geodata service.
pub trait SupermarketFinder {
    type Error: std::error::Error;

    async fn find_nearby(
        &self,
        at: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<SupermarketCandidate>, Self::Error>;
}

impl SupermarketFinder for OverpassClient {
    type Error = OverpassError;

    async fn find_nearby(
        &self,
        at: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<SupermarketCandidate>, OverpassError> {
        self.supermarkets_near(at, radius_m).await
    }
}
