use crate::Result;
use serde_json::{Map, Value};

/// JSON style overrides, addressed by dotted path (`"fontSize.legend"`).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig(Value);

impl Default for PlotConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl PlotConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    /// A list of strings, given either as a JSON array or a comma-separated string.
    pub fn get_str_list(&self, dotted_path: &str) -> Option<Vec<String>> {
        match self.lookup(dotted_path)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            Value::String(s) => Some(
                s.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            ),
            _ => None,
        }
    }
}
