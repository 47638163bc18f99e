pub mod aggregator;
pub mod classified;
pub mod detail;
pub mod harvester;
pub mod traits;
pub mod types;

pub use aggregator::Aggregator;
pub use detail::DetailExtractor;
pub use harvester::{Harvest, IdHarvester, PageFailure};
pub use traits::PropertyExtractor;
pub use types::{PropertyCategory, SearchParams, MAX_SEARCH_PAGES};
