//! Parsing of the `ingredientsForm` request parameter.
//!
//! Clients send the extra ingredients either as a JSON array of
//! `{"id": .., "name": ..}` objects or as a comma-separated id list. Both are
//! first classified into an [`IngredientInput`] and then resolved against the
//! ingredient catalog, which is the only source of ingredient names.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::{IngredientCatalog, IngredientStub, SearchError};

/// An ingredient as the client described it. The name is only a hint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StubHint {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientInput {
    Empty,
    JsonStubs(Vec<StubHint>),
    CsvIds(Vec<i32>),
}

impl IngredientInput {
    /// Requested ids in input order, without repeats.
    pub fn ids(&self) -> Vec<i32> {
        let raw: Vec<i32> = match self {
            IngredientInput::Empty => Vec::new(),
            IngredientInput::JsonStubs(hints) => hints.iter().map(|h| h.id).collect(),
            IngredientInput::CsvIds(ids) => ids.clone(),
        };
        let mut seen = HashSet::new();
        raw.into_iter().filter(|id| seen.insert(*id)).collect()
    }
}

/// Decides which wire format `raw` uses and decodes it.
///
/// A JSON document that is not an array of objects, or an id list without a
/// single numeric token, is reported as [`SearchError::MalformedIngredientInput`].
pub fn classify(raw: &str) -> Result<IngredientInput, SearchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(IngredientInput::Empty);
    }

    if trimmed.starts_with('[') {
        let entries: Vec<serde_json::Value> = serde_json::from_str(trimmed)
            .map_err(|e| SearchError::MalformedIngredientInput(format!("invalid JSON: {e}")))?;
        let hints = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<StubHint>(entry).ok())
            .collect();
        return Ok(IngredientInput::JsonStubs(hints));
    }

    let mut ids = Vec::new();
    for token in trimmed.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        match token.parse::<i32>() {
            Ok(id) => ids.push(id),
            Err(_) => warn!(token, "Dropping non-numeric ingredient id."),
        }
    }
    if ids.is_empty() {
        return Err(SearchError::MalformedIngredientInput(format!(
            "no ingredient id in {trimmed:?}"
        )));
    }
    Ok(IngredientInput::CsvIds(ids))
}

/// Resolves classified input against the catalog. Ids the catalog does not
/// know are dropped; names always come from the catalog.
pub async fn resolve(
    catalog: &dyn IngredientCatalog,
    input: &IngredientInput,
) -> Result<Vec<IngredientStub>, SearchError> {
    let ids = input.ids();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let names: HashMap<i32, String> = catalog
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|ingredient| (ingredient.id, ingredient.name))
        .collect();

    if let IngredientInput::JsonStubs(hints) = input {
        for hint in hints {
            if let Some(name) = names.get(&hint.id).filter(|name| **name != hint.name) {
                debug!(
                    id = hint.id,
                    hint = %hint.name,
                    catalog = %name,
                    "Client ingredient name differs from catalog."
                );
            }
        }
    }

    let stubs: Vec<IngredientStub> = ids
        .into_iter()
        .filter_map(|id| {
            names.get(&id).map(|name| IngredientStub {
                id,
                name: name.clone(),
            })
        })
        .collect();
    Ok(stubs)
}

/// Parses the raw parameter. Malformed input degrades to an empty list;
/// only catalog failures are returned as errors.
pub async fn parse_ingredients(
    catalog: &dyn IngredientCatalog,
    raw: &str,
) -> Result<Vec<IngredientStub>, SearchError> {
    match classify(raw) {
        Ok(input) => resolve(catalog, &input).await,
        Err(e) => {
            warn!(error = %e, "Ignoring form ingredients.");
            Ok(Vec::new())
        }
    }
}

/// Concatenates stub lists, keeping only the first stub seen for each id.
pub fn merge_unique<'a, I>(lists: I) -> Vec<IngredientStub>
where
    I: IntoIterator<Item = &'a [IngredientStub]>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|stub| seen.insert(stub.id))
        .cloned()
        .collect()
}
