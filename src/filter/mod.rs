pub mod death_query;
pub mod error;
pub mod params;
pub mod types;

pub use death_query::{escape_like, push_geo_conditions, DeathQuery};
pub use error::FilterError;
pub use params::{DeathQueryParams, ListQueryParams};
pub use types::{DeathFilter, GeoFilter, ListFilter, Page, Pagination, SortDirection, SortKey};
