//! Policy hooks the selector consumes: title validity and degraded-mode candidates.

use regex::{RegexSet, RegexSetBuilder};

use super::error::DiversityError;

/// Decides whether a title is real content (not a trailer, rail, bonus clip...).
pub trait TitleValidity: Send + Sync {
    fn is_valid_title(&self, title: &str) -> bool;
}

impl<F> TitleValidity for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid_title(&self, title: &str) -> bool {
        self(title)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllTitles;

impl TitleValidity for AcceptAllTitles {
    fn is_valid_title(&self, _title: &str) -> bool {
        true
    }
}

/// Rejects titles matching any of a set of case-insensitive patterns.
#[derive(Debug, Clone)]
pub struct TitlePatterns {
    patterns: RegexSet,
}

impl TitlePatterns {
    pub fn new<I, S>(patterns: I) -> Result<Self, DiversityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()?;
        Ok(Self { patterns })
    }

    /// Accessibility re-releases, promos, editorial rails and bonus material.
    pub fn promotional() -> Result<Self, DiversityError> {
        Self::new([
            r"\(with ASL\)|with ASL|\(ASL\)|ASL Edition",
            r"trailer|teaser|preview|sneak peek",
            r"what's on|coming soon|streaming this|years of|reframed:|craziest|the \d{4}s|new this|this month|this week",
            r"behind the scenes|making of|featurette|bonus feature|deleted scene",
        ])
    }

    pub fn patterns(&self) -> &[String] {
        self.patterns.patterns()
    }
}

impl TitleValidity for TitlePatterns {
    fn is_valid_title(&self, title: &str) -> bool {
        !self.patterns.is_match(title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackItem {
    pub item_id: String,
    pub title: String,
}

impl FallbackItem {
    /// Placeholder item whose id is derived from the title.
    pub fn from_title(title: &str) -> Self {
        Self {
            item_id: format!("mock-{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
        }
    }
}

/// Fixed candidates used when the live scoring path is unavailable or exhausted.
pub trait FallbackProvider: Send + Sync {
    fn something_else(&self) -> Vec<FallbackItem>;

    fn more_like_this(&self) -> Vec<FallbackItem>;
}

#[derive(Debug, Clone)]
pub struct StaticFallback {
    something_else: Vec<FallbackItem>,
    more_like_this: Vec<FallbackItem>,
}

impl StaticFallback {
    pub fn new<S: AsRef<str>>(something_else: &[S], more_like_this: &[S]) -> Self {
        Self {
            something_else: something_else
                .iter()
                .map(|t| FallbackItem::from_title(t.as_ref()))
                .collect(),
            more_like_this: more_like_this
                .iter()
                .map(|t| FallbackItem::from_title(t.as_ref()))
                .collect(),
        }
    }
}

impl Default for StaticFallback {
    fn default() -> Self {
        Self::new(
            &[
                "The Social Network",
                "Arrival",
                "Blade Runner 2049",
                "Mad Max: Fury Road",
                "Parasite",
                "Get Out",
                "Whiplash",
                "Moonlight",
                "La La Land",
                "The Grand Budapest Hotel",
            ],
            &[
                "Barbie",
                "Oppenheimer",
                "The Matrix",
                "Inception",
                "Interstellar",
                "The Dark Knight",
                "Pulp Fiction",
                "Fight Club",
                "Forrest Gump",
                "The Shawshank Redemption",
                "The Godfather",
                "Goodfellas",
                "The Prestige",
            ],
        )
    }
}

impl FallbackProvider for StaticFallback {
    fn something_else(&self) -> Vec<FallbackItem> {
        self.something_else.clone()
    }

    fn more_like_this(&self) -> Vec<FallbackItem> {
        self.more_like_this.clone()
    }
}
