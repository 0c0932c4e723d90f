use super::classify::count_upcoming;
use crate::directory_store::{VenueId, VenueWithShows};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: VenueId,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing one (city, state) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Groups venues by (city, state).
///
/// Groups come out in order of first appearance and venues keep the order
/// they were given in. Venues without shows are kept with a count of zero.
pub fn group_by_location(venues: &[VenueWithShows], now: DateTime<Utc>) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::new();

    for entry in venues {
        let details = &entry.venue.details;
        let summary = VenueSummary {
            id: entry.venue.id,
            name: details.name.clone(),
            num_upcoming_shows: count_upcoming(&entry.shows, now),
        };

        match groups
            .iter_mut()
            .find(|g| g.city == details.city && g.state == details.state)
        {
            Some(group) => group.venues.push(summary),
            None => groups.push(LocationGroup {
                city: details.city.clone(),
                state: details.state.clone(),
                venues: vec![summary],
            }),
        }
    }

    groups
}
