//! The provider's tabular payload: named result sets of `headers` + `rowSet`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    pub result_sets: Vec<ResultSet>,
}

impl StatsResponse {
    pub fn new(result_sets: Vec<ResultSet>) -> Self {
        Self { result_sets }
    }

    pub fn result_set(&self, name: &str) -> Option<&ResultSet> {
        self.result_sets.iter().find(|set| set.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub name: String,
    pub headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(name: &str, headers: &[&str], row_set: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            row_set,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_set.is_empty()
    }

    /// Decodes every row into `T` by pairing each cell with its header, so `T`
    /// names columns through its serde field names. Columns `T` does not
    /// mention are ignored; a missing column that `T` requires is an error.
    pub fn decode_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.row_set
            .iter()
            .map(|row| {
                let record: Map<String, Value> = self
                    .headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                serde_json::from_value(Value::Object(record))
            })
            .collect()
    }
}
