pub mod place;
pub mod search;

pub use place::{NearbySearchResponse, Place, PlacesStatus};
pub use search::{SearchParams, SearchQuery, SearchResponse, SearchStatus};
