use std::cmp::Ordering;
use std::collections::HashSet;

use crate::core::distance::haversine_distance;
use crate::models::{Coordinate, RankedPlace};

/// Insertion-ordered set of places keyed by identity
///
/// The first place seen under an identity wins; later duplicates are
/// dropped whole, even if they carry data the first one lacked.
#[derive(Debug, Clone, Default)]
pub struct PlaceSet {
    places: Vec<RankedPlace>,
    seen: HashSet<String>,
}

impl PlaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append places whose identity is not already present.
    /// Returns how many were added.
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = RankedPlace>,
    {
        let before = self.places.len();
        for place in incoming {
            if self.seen.insert(place.identity.clone()) {
                self.places.push(place);
            }
        }
        self.places.len() - before
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedPlace> {
        self.places.iter()
    }

    /// Produce the final ordering
    ///
    /// With a reference, every distance is (re)computed from it, which is
    /// idempotent for a fixed reference. Places are then sorted nearest
    /// first; places without a distance go last. The sort is stable, so
    /// ties and distance-less places keep insertion order.
    pub fn rank(mut self, reference: Option<&Coordinate>) -> Vec<RankedPlace> {
        if let Some(reference) = reference {
            for place in &mut self.places {
                place.distance_meters = Some(haversine_distance(reference, &place.coordinate));
            }
        }

        self.places
            .sort_by(|a, b| compare_distance(a.distance_meters, b.distance_meters));
        self.places
    }
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
