use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use url::Url;

use crate::client::error::ApiClientError;

/// Query string parameters for an API call.
///
/// Values are scalars (string, number, boolean). A `null` value is kept in the
/// collection but never reaches the URL, so optional filters can be passed
/// through without branching. Insertion order is the order in the URL.
///
/// # Example
///
/// ```rust
/// use apicheck_core::QueryParams;
///
/// let params = QueryParams::new()
///     .add_param("limit", 10)
///     .add_param("offset", 0)
///     .add_param("author", None::<String>);
///
/// assert_eq!(params.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: IndexMap<String, Value>,
}

impl QueryParams {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value with the same name.
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Checks if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of parameters, `null` ones included.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns the value of a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Appends the non-null parameters to the URL query, percent-encoded.
    pub(in crate::client) fn append_to(&self, url: &mut Url) -> Result<(), ApiClientError> {
        let mut pairs = Vec::with_capacity(self.params.len());
        for (name, value) in &self.params {
            let value = match value {
                Value::Null => continue,
                Value::String(text) => text.clone(),
                Value::Bool(_) | Value::Number(_) => value.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ApiClientError::configuration(
                        "Unsupported query parameter value: only scalars are allowed",
                        json!({ "name": name, "value": value }),
                    ));
                }
            };
            pairs.push((name.as_str(), value));
        }

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let params = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { params }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(params: [(K, V); N]) -> Self {
        params.into_iter().collect()
    }
}

impl From<Map<String, Value>> for QueryParams {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}
