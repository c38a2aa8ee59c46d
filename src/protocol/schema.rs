//! JSON Schema wrapper with lazy compilation.

use jsonschema::{Draft, JSONSchema};
use once_cell::sync::OnceCell;
use serde_json::Value;

/// A JSON Schema document, compiled on first use and cached for the descriptor's lifetime.
pub struct Schema {
    source: Value,
    compiled: OnceCell<Result<JSONSchema, String>>,
}

impl Schema {
    pub fn new(source: Value) -> Self {
        Self {
            source,
            compiled: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Compiled validator, or the compilation error message for a broken schema.
    pub fn compiled(&self) -> Result<&JSONSchema, &str> {
        self.compiled
            .get_or_init(|| {
                JSONSchema::options()
                    .with_draft(Draft::Draft7)
                    .compile(&self.source)
                    .map_err(|e| format!("Failed to compile schema: {}", e))
            })
            .as_ref()
            .map_err(String::as_str)
    }
}

impl Clone for Schema {
    fn clone(&self) -> Self {
        Self::new(self.source.clone())
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("source", &self.source)
            .field("compiled", &self.compiled.get().map(|c| c.is_ok()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compiles_once_and_reports_broken_schemas() {
        let ok = Schema::new(json!({"type": "integer", "minimum": 1}));
        assert!(ok.compiled().is_ok());
        assert!(ok.compiled().unwrap().is_valid(&json!(3)));

        let broken = Schema::new(json!({"type": 12}));
        assert!(broken.compiled().is_err());
    }
}
