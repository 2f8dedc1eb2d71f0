//! Selection and ranking of recipes for a search.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use super::{RankedRecipe, RecipeRecord};

/// Inputs of one matching pass.
#[derive(Debug, Clone, Copy)]
pub struct MatchCriteria<'a> {
    pub blacklist_ids: &'a BTreeSet<i32>,
    /// Empty disables the diet filter.
    pub diet_ids: &'a BTreeSet<i32>,
    /// Empty disables ranking; the base order is returned as is.
    pub available_ids: &'a BTreeSet<i32>,
}

/// Keeps the recipes a search may return.
///
/// A recipe survives when it is public, none of its ingredients is
/// blacklisted, and (if any diets are given) at least one of its diet tags is
/// among them. A recipe without ingredients is never blacklisted.
pub fn is_eligible(recipe: &RecipeRecord, criteria: &MatchCriteria<'_>) -> bool {
    if !recipe.is_public {
        return false;
    }
    if recipe.has_ingredient_in(criteria.blacklist_ids) {
        return false;
    }
    criteria.diet_ids.is_empty() || recipe.has_diet_in(criteria.diet_ids)
}

/// Filters `corpus` and orders the survivors.
///
/// Base order is newest first, ties broken by higher id. When ingredients are
/// available the list is then stably re-sorted by descending match count, so
/// recipes with equal counts keep their base order.
pub fn rank(corpus: Vec<RecipeRecord>, criteria: &MatchCriteria<'_>) -> Vec<RankedRecipe> {
    let mut eligible: Vec<RecipeRecord> = corpus
        .into_iter()
        .filter(|recipe| is_eligible(recipe, criteria))
        .collect();

    eligible.sort_by_key(|recipe| Reverse((recipe.created_at, recipe.id)));

    let mut ranked: Vec<RankedRecipe> = eligible
        .into_iter()
        .map(|recipe| {
            let match_count = recipe.match_count(criteria.available_ids);
            RankedRecipe {
                recipe,
                match_count,
            }
        })
        .collect();

    if !criteria.available_ids.is_empty() {
        // `sort_by_key` is stable.
        ranked.sort_by_key(|entry| Reverse(entry.match_count));
    }

    ranked
}
