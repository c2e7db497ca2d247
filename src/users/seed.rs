use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::users::{dto::CreateUserRequest, services::UsersService};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub failed: usize,
}

/// Read a JSON array of `{ email, firstName, lastName, password }`.
pub async fn load_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<CreateUserRequest>> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("read seed file {}", path.display()))?;
    let records: Vec<CreateUserRequest> = serde_json::from_slice(&raw)
        .with_context(|| format!("parse seed file {}", path.display()))?;
    Ok(records)
}

/// Feed each record through `create` in order. Failures are logged and skipped.
pub async fn seed_users(users: &UsersService, records: Vec<CreateUserRequest>) -> SeedReport {
    let mut report = SeedReport::default();
    for record in records {
        let email = record.email.clone();
        let result = match record.validate() {
            Ok(new_user) => users.create(new_user).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => report.created += 1,
            Err(e) => {
                warn!(%email, error = %e, "seed record skipped");
                report.failed += 1;
            }
        }
    }
    info!(created = report.created, failed = report.failed, "seeding finished");
    report
}
