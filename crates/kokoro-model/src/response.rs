use indexmap::IndexMap;
use indexmap::map::Iter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Selected scale value per question id, in the order the questions were first answered.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(transparent)]
pub struct ResponseSet(IndexMap<String, i32>);

impl ResponseSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `question_id` and returns the value it replaced.
    pub fn insert(&mut self, question_id: impl Into<String>, value: i32) -> Option<i32> {
        self.0.insert(question_id.into(), value)
    }

    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<i32> {
        self.0.get(question_id).copied()
    }

    #[must_use]
    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, i32> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ResponseSet {
    type Item = (&'a String, &'a i32);
    type IntoIter = Iter<'a, String, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for ResponseSet {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}
