use std::collections::BTreeSet;

use super::{IngredientStub, ProfileSource, SearchError, UserId};

/// Read-only projection of a user record used by one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfileFacts {
    pub blacklist_ids: BTreeSet<i32>,
    pub diet_ids: BTreeSet<i32>,
    /// `None` when the user has no fridge at all, as opposed to an empty one.
    pub fridge: Option<Vec<IngredientStub>>,
}

impl UserProfileFacts {
    pub fn has_fridge(&self) -> bool {
        self.fridge.is_some()
    }

    pub fn fridge_stubs(&self) -> &[IngredientStub] {
        self.fridge.as_deref().unwrap_or_default()
    }

    /// Fridge contents to feed into the search, honouring the request's
    /// "use fridge" flag.
    pub fn fridge_contribution(&self, use_fridge: bool) -> Vec<IngredientStub> {
        if use_fridge {
            self.fridge_stubs().to_vec()
        } else {
            Vec::new()
        }
    }
}

pub async fn load_profile_facts(
    source: &dyn ProfileSource,
    user_id: UserId,
) -> Result<UserProfileFacts, SearchError> {
    let facts = source.load_profile(user_id).await?;
    tracing::debug!(
        user_id = %user_id,
        blacklist = facts.blacklist_ids.len(),
        diets = facts.diet_ids.len(),
        has_fridge = facts.has_fridge(),
        "Loaded profile facts."
    );
    Ok(facts)
}
