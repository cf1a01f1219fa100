use std::fmt;

/// Record kinds and the MongoDB collection each one lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    User,
    Product,
    PodcastEpisode,
    Inquiry,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::User,
        Collection::Product,
        Collection::PodcastEpisode,
        Collection::Inquiry,
    ];

    /// The collection name in the database.
    pub fn name(self) -> &'static str {
        match self {
            Collection::User => "user",
            Collection::Product => "product",
            Collection::PodcastEpisode => "podcastepisode",
            Collection::Inquiry => "inquiry",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
