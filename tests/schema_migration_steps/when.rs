//! When steps for schema migration BDD scenarios.

use super::world::{MigrationWorld, Outcome, run_async};
use family_task_backend::household::{adapters::sqlite::SqliteTaskRepository, ports::TaskRepository};
use family_task_backend::store::SchemaMigrator;
use rstest_bdd_macros::when;

#[when("the schema is upgraded")]
fn schema_upgraded(world: &mut MigrationWorld) {
    world.outcome = Some(match run_async(world.store.upgrade()) {
        Ok(_) => Outcome::Succeeded,
        Err(err) => Outcome::Store(err),
    });
}

#[when("the schema is downgraded")]
fn schema_downgraded(world: &mut MigrationWorld) {
    world.outcome = Some(match run_async(world.store.downgrade()) {
        Ok(_) => Outcome::Succeeded,
        Err(err) => Outcome::Store(err),
    });
}

#[when("the forward script runs again")]
fn forward_script_again(world: &mut MigrationWorld) -> Result<(), eyre::Report> {
    let mut conn = world.store.connection()?;
    world.outcome = Some(match SchemaMigrator::apply_initial_script(&mut conn) {
        Ok(()) => Outcome::Succeeded,
        Err(err) => Outcome::Store(err),
    });
    Ok(())
}

#[when("the task is deleted")]
fn task_deleted(world: &mut MigrationWorld) -> Result<(), eyre::Report> {
    let task_id = world
        .task
        .as_ref()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let repo = SqliteTaskRepository::new(world.store.clone());
    world.outcome = Some(match run_async(repo.delete(task_id)) {
        Ok(()) => Outcome::Succeeded,
        Err(err) => Outcome::Repository(err),
    });
    Ok(())
}

#[when(r#"user "{subject}" creates the tag "{name}""#)]
fn user_creates_tag(
    world: &mut MigrationWorld,
    subject: String,
    name: String,
) -> Result<(), eyre::Report> {
    let owner = world.user(&subject)?;
    world.outcome = Some(match world.create_tag(&owner, &name) {
        Ok(_) => Outcome::Succeeded,
        Err(err) => Outcome::Repository(err),
    });
    Ok(())
}
