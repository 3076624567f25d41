//! Name to identifier resolution
//!
//! Commands accept either a resource name or its identifier. Names are looked
//! up in the list of resources of that kind; anything that is not a known name
//! is passed through as an identifier.

use crate::resources::name_index;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct NameResolver {
    index: HashMap<String, String>,
}

impl NameResolver {
    pub fn from_items(items: &[Value]) -> Self {
        NameResolver {
            index: name_index(items),
        }
    }

    /// Identifier for `name_or_id`, or the input itself when no resource has that name.
    pub fn resolve(&self, name_or_id: &str) -> String {
        match self.index.get(name_or_id) {
            Some(id) => {
                tracing::debug!("resolved name '{}' to '{}'", name_or_id, id);
                id.clone()
            }
            None => name_or_id.to_string(),
        }
    }

    /// Closest known name, for "did you mean" hints after a failed lookup.
    pub fn suggest(&self, input: &str) -> Option<&str> {
        let matcher = SkimMatcherV2::default();
        self.index
            .keys()
            .filter(|name| name.as_str() != input)
            .filter_map(|name| matcher.fuzzy_match(name, input).map(|score| (score, name)))
            .max_by(|(a, na), (b, nb)| a.cmp(b).then_with(|| nb.cmp(na)))
            .map(|(_, name)| name.as_str())
    }
}
