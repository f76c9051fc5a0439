//! Group service.

use papyrus_common::AppResult;
use papyrus_db::{entities::group, repositories::GroupRepository};

/// Group service for business logic.
///
/// Groups are provisioned out of band; this service only reads them.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub const fn new(group_repo: GroupRepository) -> Self {
        Self { group_repo }
    }

    /// Look up a group by slug. Unknown slug is a not-found outcome.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<group::Model> {
        self.group_repo.get_by_slug(slug).await
    }

    /// All groups, ordered by title.
    pub async fn list_all(&self) -> AppResult<Vec<group::Model>> {
        self.group_repo.find_all().await
    }
}
