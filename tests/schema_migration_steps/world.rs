//! Shared world state for schema migration BDD scenarios.

use std::collections::HashMap;

use family_task_backend::household::{
    adapters::sqlite::{SqliteTagRepository, SqliteUserRepository},
    domain::{RandomIds, Tag, TagName, Task, User, UserProfile},
    ports::{HouseholdRepositoryError, TagRepository, UserRepository},
};
use family_task_backend::store::{StoreContext, StoreError};
use mockable::DefaultClock;
use rstest::fixture;
use tempfile::TempDir;

/// Outcome of the scenario's `When` step.
#[derive(Debug)]
pub enum Outcome {
    /// The step completed.
    Succeeded,
    /// A store-level operation failed.
    Store(StoreError),
    /// A repository operation failed.
    Repository(HouseholdRepositoryError),
}

/// Scenario world for schema migration behaviour tests.
pub struct MigrationWorld {
    pub store: StoreContext,
    pub users: HashMap<String, User>,
    pub tags: HashMap<String, Tag>,
    pub task: Option<Task>,
    pub outcome: Option<Outcome>,
    _dir: TempDir,
}

impl MigrationWorld {
    /// Creates a world over a fresh, unmigrated file-backed store.
    ///
    /// # Panics
    ///
    /// Panics when the temporary store cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let url = format!("sqlite:///{}", dir.path().join("scenario.db").display());
        let store = StoreContext::connect(&url, 2).expect("store connects");
        Self {
            store,
            users: HashMap::new(),
            tags: HashMap::new(),
            task: None,
            outcome: None,
            _dir: dir,
        }
    }

    /// Returns the user registered under `subject`, registering them first
    /// if needed.
    pub fn user(&mut self, subject: &str) -> Result<User, eyre::Report> {
        if let Some(existing) = self.users.get(subject) {
            return Ok(existing.clone());
        }
        let profile = UserProfile::new(subject, format!("{subject}@example.com"), subject)?;
        let user = User::register(profile, &RandomIds, &DefaultClock);
        run_async(SqliteUserRepository::new(self.store.clone()).store(&user))?;
        self.users.insert(subject.to_owned(), user.clone());
        Ok(user)
    }

    /// Creates a tag named `name` owned by `owner`.
    pub fn create_tag(&self, owner: &User, name: &str) -> Result<Tag, HouseholdRepositoryError> {
        let tag_name = TagName::new(name)
            .map_err(|err| HouseholdRepositoryError::Constraint(err.to_string()))?;
        let tag = Tag::new(tag_name, owner.id(), &RandomIds, &DefaultClock);
        run_async(SqliteTagRepository::new(self.store.clone()).store(&tag))?;
        Ok(tag)
    }
}

impl Default for MigrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MigrationWorld {
    MigrationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
