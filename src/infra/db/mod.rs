//! Database connection pool and transaction management.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection,
    DatabaseTransaction, Statement, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use crate::config::{DbConfig, MEMORY_CONNECTION_LIFETIME};
use crate::errors::{AppError, AppResult};

pub mod migrations;

pub use migrations::Migrator;

/// Boxed future returned by transaction bodies.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Exclusive owner of the connection pool.
///
/// Cloning shares the same pool and the same closed flag.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
    closed: Arc<AtomicBool>,
}

impl Database {
    /// Open the pool without touching the schema.
    ///
    /// Fails with `AppError::Connection` when the host is unreachable or the
    /// credentials are rejected. No retry is attempted.
    pub async fn open(config: &DbConfig) -> AppResult<Self> {
        match SeaDatabase::connect(connect_options(config)).await {
            Ok(connection) => {
                tracing::info!(driver = %config.driver, name = %config.name, "Database connection succeed");
                Ok(Self {
                    connection,
                    closed: Arc::new(AtomicBool::new(false)),
                })
            }
            Err(e) => {
                tracing::error!(driver = %config.driver, addr = %config.addr, "Database connection failed: {}", e);
                Err(AppError::Connection(e))
            }
        }
    }

    /// Open the pool and apply pending migrations.
    pub async fn connect(config: &DbConfig) -> AppResult<Self> {
        let db = Self::open(config).await?;
        db.run_migrations().await?;
        tracing::info!("Database migrations applied");
        Ok(db)
    }

    /// Live connection, or `AppError::Closed` once `close` has run.
    pub fn connection(&self) -> AppResult<&DatabaseConnection> {
        if self.is_closed() {
            return Err(AppError::Closed);
        }
        Ok(&self.connection)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(self.connection()?, None).await?;
        Ok(())
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> AppResult<()> {
        let conn = self.connection()?;
        conn.execute(Statement::from_string(
            conn.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await?;
        Ok(())
    }

    /// Release the pool. Only the first call closes; later calls are no-ops.
    pub async fn close(&self) -> AppResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Database already closed");
            return Ok(());
        }

        match self.connection.clone().close().await {
            Ok(()) => {
                tracing::info!("Database connection closed");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Disconnect from database failed: {}", e);
                Err(AppError::Database(e))
            }
        }
    }

    /// Execute a closure within a transaction.
    ///
    /// Commits when the closure succeeds. On error the transaction is rolled
    /// back and the closure's error is returned unchanged.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.connection()?.begin().await?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

fn connect_options(config: &DbConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.dsn());
    options
        .max_connections(config.max_open_conns.max(1))
        .min_connections(config.max_idle_conns.min(config.max_open_conns.max(1)))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    if config.is_memory() {
        options
            .idle_timeout(MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(MEMORY_CONNECTION_LIFETIME);
    } else {
        options.idle_timeout(Duration::from_secs(config.idle_timeout_secs));
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_ping_close() {
        let db = Database::open(&DbConfig::sqlite_memory()).await.unwrap();

        assert!(db.ping().await.is_ok());
        assert!(db.close().await.is_ok());
        assert!(db.is_closed());
    }

    #[test]
    fn test_memory_connection_is_never_recycled() {
        let options = connect_options(&DbConfig::sqlite_memory());
        assert_eq!(options.get_max_lifetime(), Some(MEMORY_CONNECTION_LIFETIME));
        assert_eq!(options.get_idle_timeout(), Some(MEMORY_CONNECTION_LIFETIME));

        let options = connect_options(&DbConfig::default());
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(options.get_max_connections(), Some(10));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let db = Database::open(&DbConfig::sqlite_memory()).await.unwrap();

        assert!(db.close().await.is_ok());
        assert!(db.close().await.is_ok());
    }

    #[tokio::test]
    async fn test_operations_after_close_fail_closed() {
        let db = Database::open(&DbConfig::sqlite_memory()).await.unwrap();
        let shared = db.clone();
        db.close().await.unwrap();

        assert!(matches!(shared.ping().await, Err(AppError::Closed)));
        assert!(matches!(shared.connection(), Err(AppError::Closed)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let config = DbConfig {
            driver: "postgres".to_string(),
            addr: "127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            ..DbConfig::default()
        };

        let result = Database::open(&config).await;
        assert!(matches!(result, Err(AppError::Connection(_))));
    }

    #[tokio::test]
    async fn test_failed_transaction_rolls_back() {
        let db = Database::open(&DbConfig::sqlite_memory()).await.unwrap();
        db.connection()
            .unwrap()
            .execute_unprepared("CREATE TABLE t (v INTEGER)")
            .await
            .unwrap();

        let result: AppResult<()> = db
            .transaction(|txn| {
                Box::pin(async move {
                    txn.execute_unprepared("INSERT INTO t (v) VALUES (1)").await?;
                    Err(AppError::internal("abort"))
                })
            })
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));

        let row = db
            .connection()
            .unwrap()
            .query_one(Statement::from_string(
                sea_orm::DatabaseBackend::Sqlite,
                "SELECT COUNT(*) AS n FROM t".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 0);
    }
}
