use uuid::Uuid;
use crate::auth::CredentialHasher;
use crate::errors::AppResult;
use crate::models::{Project, User};
use crate::services::Store;

pub const DEMO_EMAIL: &str = "admin@example.com";
pub const DEMO_PASSWORD: &str = "admin123";
pub const DEMO_PROJECT: &str = "Demo project";

/// Populate an empty store with a demo user and project so the API can be
/// tried straight away. Existing data is left untouched.
pub async fn seed_demo_data(store: &dyn Store, hasher: &CredentialHasher) -> AppResult<()> {
    if store.count_users().await? == 0 {
        let user = User {
            id: Uuid::new_v4(),
            email: DEMO_EMAIL.to_string(),
            password_hash: hasher.hash(DEMO_PASSWORD)?,
        };
        store.insert_user(&user).await?;
        tracing::info!("Seeded demo user: {}", DEMO_EMAIL);
    }

    if store.list_projects().await?.is_empty() {
        let project = Project {
            id: Uuid::new_v4(),
            name: DEMO_PROJECT.to_string(),
        };
        store.insert_project(&project).await?;
        tracing::info!("Seeded demo project: {}", DEMO_PROJECT);
    }

    Ok(())
}
