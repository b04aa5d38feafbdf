use crate::config::StorageConfig;
use crate::domain::health::ServiceIdentity;

/// Reports static process identity. Never touches storage.
#[derive(Clone, Debug)]
pub struct HealthService {
    identity: ServiceIdentity,
}

impl HealthService {
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self { identity: ServiceIdentity { table: config.table.clone(), region: config.region.clone() } }
    }

    #[must_use]
    pub const fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }
}
