/// Listing primary keys, as issued by the marketplace backend.
pub type MemberId = i64;

/// Name of the query parameter carrying the deep-linked variant id.
pub const VARIATION_PARAM: &str = "variation";
