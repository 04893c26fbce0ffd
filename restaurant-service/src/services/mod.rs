pub mod filter_output;
pub mod merger;
pub mod places;
pub mod providers;
pub mod search;
pub mod semantic_filter;

pub use places::{LookupError, NearbySearch, PlacesClient};
pub use search::RestaurantSearch;
pub use semantic_filter::{FilterOutcome, SemanticFilter};
