use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::listening::{Artist, RecentlyPlayedItem};

/// Boost added to a genre each time a recently played track's artist carries it.
pub const RECENCY_BOOST_STEP: f64 = 0.15;
const MAX_RECENCY_ENTRIES: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecencyBoostEntry {
    pub genre: String,
    pub boost: f64,
}

pub fn compute_recency_boost(
    recent: &[RecentlyPlayedItem],
    artists: &[Artist],
) -> Vec<RecencyBoostEntry> {
    let by_id: HashMap<&str, &Artist> = artists.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut boosts: Vec<RecencyBoostEntry> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for item in recent {
        for artist_id in &item.artist_ids {
            let Some(&artist) = by_id.get(artist_id.as_str()) else {
                continue;
            };
            for genre in &artist.genres {
                match positions.get(genre.as_str()) {
                    Some(&position) => boosts[position].boost += RECENCY_BOOST_STEP,
                    None => {
                        positions.insert(genre.as_str(), boosts.len());
                        boosts.push(RecencyBoostEntry {
                            genre: genre.clone(),
                            boost: RECENCY_BOOST_STEP,
                        });
                    }
                }
            }
        }
    }

    boosts.sort_by(|a, b| b.boost.total_cmp(&a.boost));
    boosts.truncate(MAX_RECENCY_ENTRIES);
    boosts
}
