//! Saved designs
//!
//! A design is an immutable, named snapshot of a form. The hosting
//! application persists designs and the working field list under the keys
//! below; this crate only produces and consumes the values.

use crate::diagnostics::DiagnosticsTracker;
use crate::error::{Result, StrictMode};
use crate::record::FieldRecord;
use crate::types::{FormSchema, IdSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of the working field list in the host's key-value store
pub const FIELDS_STORAGE_KEY: &str = "formBuilder_fields_v2";

/// Key of the saved design list in the host's key-value store
pub const DESIGNS_STORAGE_KEY: &str = "formBuilder_saves_v2";

/// Opaque design identifier, distinct from field ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignId(String);

impl DesignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named snapshot of a field sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: DesignId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub fields: Vec<FieldRecord>,
}

impl Design {
    /// Freeze `schema`; without a name the design is called `Design <timestamp>`
    pub fn snapshot(
        name: Option<&str>,
        schema: &FormSchema,
        created_at: DateTime<Utc>,
        ids: &mut impl IdSource,
    ) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Self::default_name(&created_at));

        Self {
            id: DesignId::new(ids.next_id().as_str()),
            name,
            created_at,
            fields: schema.to_records(),
        }
    }

    pub fn default_name(created_at: &DateTime<Utc>) -> String {
        format!("Design {}", created_at.format("%Y-%m-%d %H:%M:%S"))
    }

    /// Rebuild the typed schema from the stored records
    pub fn restore(&self, mode: StrictMode, tracker: &mut DiagnosticsTracker) -> Result<FormSchema> {
        FormSchema::from_records(&self.fields, mode, tracker)
    }

    /// Parse the value stored under [`DESIGNS_STORAGE_KEY`]
    pub fn list_from_json(json: &str) -> Result<Vec<Design>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn list_to_json(designs: &[Design]) -> Result<String> {
        Ok(serde_json::to_string(designs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldKind, FieldSchema, SequentialIds};
    use chrono::TimeZone;

    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSchema::builder("email", FieldKind::Input).build().unwrap(),
            FieldSchema::builder("plan", FieldKind::Select {
                options: vec!["Free".to_string(), "Pro".to_string()],
            })
            .build()
            .unwrap(),
        ])
        .unwrap()
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_snapshot_default_name() {
        let mut ids = SequentialIds::new("design");
        let design = Design::snapshot(None, &schema(), timestamp(), &mut ids);
        assert_eq!(design.id.as_str(), "design-1");
        assert_eq!(design.name, "Design 2025-03-14 09:26:53");
        assert_eq!(design.fields.len(), 2);

        let named = Design::snapshot(Some("  Signup  "), &schema(), timestamp(), &mut ids);
        assert_eq!(named.name, "Signup");
        assert_eq!(named.id.as_str(), "design-2");
    }

    #[test]
    fn test_restore_round_trip() {
        let original = schema();
        let design = Design::snapshot(Some("Signup"), &original, timestamp(), &mut SequentialIds::new("d"));
        let mut tracker = DiagnosticsTracker::new();
        let restored = design.restore(StrictMode::Strict, &mut tracker).unwrap();
        assert_eq!(restored, original);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_storage_json_shape() {
        let design = Design::snapshot(Some("Signup"), &schema(), timestamp(), &mut SequentialIds::new("d"));
        let json = Design::list_to_json(std::slice::from_ref(&design)).unwrap();
        assert!(json.contains("\"createdAt\":\"2025-03-14T09:26:53Z\""));

        let parsed = Design::list_from_json(&json).unwrap();
        assert_eq!(parsed, vec![design]);
    }

    #[test]
    fn test_design_id_is_its_own_type() {
        let json = r#"[{"id":"d-7","name":"Saved","createdAt":"2025-03-14T09:26:53Z","fields":[]}]"#;
        let designs = Design::list_from_json(json).unwrap();
        let id: &DesignId = &designs[0].id;
        assert_eq!(id, &DesignId::new("d-7"));
        assert_eq!(id.to_string(), "d-7");
        assert!(Design::list_to_json(&designs).unwrap().contains("\"id\":\"d-7\""));
    }
}
