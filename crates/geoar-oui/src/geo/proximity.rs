//! Proximity filtering: candidate messages to distance-sorted nearby items

use serde::{Deserialize, Serialize};

use super::{bearing, distance, GeoPoint};

/// Author attribution carried alongside a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar_url: None,
        }
    }
}

/// A geo-tagged message supplied by the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMessage {
    pub id: String,
    pub content: String,
    pub position: GeoPoint,
    pub author: Author,
}

impl CandidateMessage {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        position: GeoPoint,
        author: Author,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            position,
            author,
        }
    }
}

/// A message annotated with its distance and bearing from the observer.
///
/// Rebuilt from scratch on every filter pass; this is also the payload shape
/// handed to the paired device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityItem {
    pub id: String,
    pub content: String,
    pub author: Author,
    pub distance_meters: f64,
    pub bearing_degrees: f64,
}

/// Keep candidates within `radius_m` of `observer`, closest first.
///
/// The sort is stable, so equidistant items keep their input order. When
/// `max_items` is set the list is truncated after sorting. Duplicate ids are
/// passed through untouched.
pub fn filter_nearby(
    observer: GeoPoint,
    candidates: &[CandidateMessage],
    radius_m: f64,
    max_items: Option<usize>,
) -> Vec<ProximityItem> {
    let mut items: Vec<ProximityItem> = candidates
        .iter()
        .filter_map(|message| {
            let distance_meters = distance(observer, message.position);
            if !(distance_meters <= radius_m) {
                return None;
            }
            Some(ProximityItem {
                id: message.id.clone(),
                content: message.content.clone(),
                author: message.author.clone(),
                distance_meters,
                bearing_degrees: bearing(observer, message.position),
            })
        })
        .collect();

    items.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));

    if let Some(max) = max_items {
        items.truncate(max);
    }

    items
}
