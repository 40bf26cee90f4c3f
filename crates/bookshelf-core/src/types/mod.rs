//! Validated URL and identifier types.
//!
//! These types enforce their invariants at construction time, so a value
//! that exists is always usable in a request.

mod api_url;
mod ids;
mod media_url;

pub use api_url::ApiUrl;
pub use ids::{BookId, EntryId, ReadingListId};
pub use media_url::MediaBaseUrl;
