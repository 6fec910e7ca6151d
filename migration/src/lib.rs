pub use sea_orm_migration::prelude::*;

mod m20250301_000001_initial;
mod m20250412_000001_add_archived_and_subject;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_initial::Migration),
            Box::new(m20250412_000001_add_archived_and_subject::Migration),
        ]
    }
}
