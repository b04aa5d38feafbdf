/// Which table this process serves, as reported by the health check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub table: String,
    pub region: String,
}
