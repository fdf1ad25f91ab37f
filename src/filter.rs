//! Selects which point features are visible at the map's scale.

use crate::feature::{Place, PlaceLayer, WaterLayer};

/// Population rules for place visibility on one country's map.
///
/// Places inside the target country pass a lower threshold than foreign
/// places, surfacing more local detail while keeping only major neighbors.
#[derive(Debug, Clone)]
pub struct PlaceFilter {
    pub target_iso: String,
    pub own_threshold: f64,
    pub neighbor_threshold: f64,
}

impl PlaceFilter {
    /// True if the place clears the population floor for its country.
    pub fn admits(&self, place: &Place) -> bool {
        if place.iso == self.target_iso {
            place.population >= self.own_threshold
        } else {
            place.population >= self.neighbor_threshold
        }
    }

    /// Split admitted places into disjoint capital and town subsets.
    /// Every input record lands in at most one output.
    pub fn split(&self, layer: &PlaceLayer) -> (PlaceLayer, PlaceLayer) {
        let (capitals, towns): (Vec<Place>, Vec<Place>) = layer
            .records
            .iter()
            .filter(|p| self.admits(p))
            .cloned()
            .partition(|p| p.capital);

        (PlaceLayer::new(capitals), PlaceLayer::new(towns))
    }
}

/// Water bodies prominent enough to label: scale rank strictly below the
/// configured cutoff (lower rank = more prominent).
pub fn water_labels(layer: &WaterLayer, scale_rank_cutoff: i32) -> WaterLayer {
    let records = layer
        .records
        .iter()
        .filter(|w| w.scale_rank < scale_rank_cutoff)
        .cloned()
        .collect();
    WaterLayer::new(records)
}
