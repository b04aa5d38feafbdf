use crate::domain::health::ServiceIdentity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub table: String,
    pub region: String,
}

impl From<&ServiceIdentity> for HealthResponse {
    fn from(identity: &ServiceIdentity) -> Self {
        Self { status: "ok".to_string(), table: identity.table.clone(), region: identity.region.clone() }
    }
}
