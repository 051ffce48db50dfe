use std::sync::Arc;

use ff1000::context::ScoringContext;
use ff1000::diversity::{DiversityError, DiversitySelector, TitlePatterns};

#[derive(Clone)]
pub struct HandlerState {
    pub context: Arc<ScoringContext>,

    pub selector: DiversitySelector,
}

impl HandlerState {
    /// Serves `context` with the promotional-title patterns and the built-in fallback lists.
    pub fn new(context: Arc<ScoringContext>) -> Result<Self, DiversityError> {
        let selector = DiversitySelector::new(Arc::clone(&context))
            .with_validity(TitlePatterns::promotional()?);
        Ok(Self { context, selector })
    }

    pub fn with_selector(context: Arc<ScoringContext>, selector: DiversitySelector) -> Self {
        Self { context, selector }
    }
}
