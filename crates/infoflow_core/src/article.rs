/// One normalized search result.
///
/// `published_at` keeps the backend timestamp untouched; it may not parse and
/// is only interpreted when displayed (see [`crate::DateFormatter`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub source: String,
    pub published_at: String,
    pub url: String,
    pub image_url: Option<String>,
}
