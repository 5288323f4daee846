use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reviews are free-form; the API only ever lists them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Review(pub Map<String, Value>);
