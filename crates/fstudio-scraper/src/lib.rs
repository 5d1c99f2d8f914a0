pub mod client;
pub mod error;
pub mod extract;
pub mod harvest;
pub mod normalize;
pub mod pagination;

pub use client::{FashionClient, PageFetcher};
pub use error::ScraperError;
pub use extract::{first_match, first_match_or_default, CardSelectors, ExtractedFields};
pub use harvest::Harvester;
pub use normalize::{normalize, normalize_record};
pub use pagination::{page_url, run};
