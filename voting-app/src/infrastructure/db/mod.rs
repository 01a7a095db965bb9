pub mod entities;
mod proposal_repository;
mod user_repository;
mod vote_repository;

pub use proposal_repository::{ListingOrder, ProposalFilter, ProposalRepository};
pub use user_repository::UserRepository;
pub use vote_repository::VoteRepository;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, SqlErr,
    Statement,
};
use std::time::Duration;
use voting_errors::AppError;

pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let migration = include_str!("../../../../migrations/001_initial.sql");

    // Every statement is IF NOT EXISTS, so re-running on startup is safe.
    for statement in migration.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        db.execute(Statement::from_string(
            db.get_database_backend(),
            statement.to_string(),
        ))
        .await?;
    }

    tracing::info!("Database migrations applied");
    Ok(())
}

/// Creates the tables straight from the entity definitions, foreign keys and
/// cascades included. Meant for throwaway databases such as in-memory SQLite.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    db.execute(backend.build(&schema.create_table_from_entity(entities::User)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(entities::Proposal)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(entities::Vote)))
        .await?;

    Ok(())
}

/// Maps a store failure onto the error taxonomy. Constraint violations are the
/// caller's fault; everything else is logged and reported as internal.
pub fn classify_db_error(err: DbErr, context: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            return AppError::Conflict(format!("{context}: already exists"));
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            return AppError::NotFound(format!("{context}: referenced record not found"));
        }
        _ => {}
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => {
            AppError::NotFound(format!("{context}: not found"))
        }
        other => {
            tracing::error!(error = %other, "{}", context);
            AppError::Internal(other.to_string())
        }
    }
}
