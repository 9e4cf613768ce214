//! PII category lookup model, seeded by the initial migration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiCategory {
    pub name: String,
    pub description: String,
    pub severity_level: i32,
}
