//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod activities;
mod allocations;
mod paycodes;
mod requests;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, TeachAllocError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::migrated(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 内存 SQLite（测试用），单连接保证所有查询看到同一个库
    pub async fn new_in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrated(db).await
    }

    /// 底层连接，供初始化数据与测试使用
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn migrated(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TeachAllocError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs));
        // 内存库随连接关闭而消失
        pool = if in_memory {
            pool.idle_timeout(None).max_lifetime(None)
        } else {
            pool.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| TeachAllocError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TeachAllocError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TeachAllocError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    activities::entities::Occurrence,
    allocations::{
        entities::AllocationRow,
        requests::{AllocationEdit, AllocationFilter, CreateUnscheduledRequest},
    },
    paycodes::entities::Paycode,
    requests::{
        entities::{RequestDecision, RequestRecord},
        requests::NewRequest,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::{AllocationUpdate, Storage};
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn list_tutors_by_unit(&self, unit_code: &str) -> Result<Vec<User>> {
        self.list_tutors_by_unit_impl(unit_code).await
    }

    // 薪酬代码模块
    async fn list_paycodes(&self) -> Result<Vec<Paycode>> {
        self.list_paycodes_impl().await
    }

    // 教学活动模块
    async fn activity_exists(&self, activity_id: i64) -> Result<bool> {
        self.activity_exists_impl(activity_id).await
    }

    async fn list_occurrences(
        &self,
        activity_id: i64,
        from: Option<NaiveDate>,
    ) -> Result<Vec<Occurrence>> {
        self.list_occurrences_impl(activity_id, from).await
    }

    // 分配模块
    async fn list_allocation_rows(
        &self,
        filter: &AllocationFilter,
        limit: Option<u64>,
    ) -> Result<Vec<AllocationRow>> {
        self.list_allocation_rows_impl(filter, limit).await
    }

    async fn get_allocation_row(&self, id: i64) -> Result<Option<AllocationRow>> {
        self.get_allocation_row_impl(id).await
    }

    async fn update_allocation(
        &self,
        id: i64,
        edit: AllocationEdit,
    ) -> Result<Option<AllocationUpdate>> {
        self.update_allocation_impl(id, edit).await
    }

    async fn create_unscheduled_allocation(
        &self,
        req: CreateUnscheduledRequest,
    ) -> Result<AllocationRow> {
        self.create_unscheduled_allocation_impl(req).await
    }

    async fn list_swap_candidates(&self, allocation: &AllocationRow) -> Result<Vec<AllocationRow>> {
        self.list_swap_candidates_impl(allocation).await
    }

    // 申请模块
    async fn create_request(&self, req: NewRequest) -> Result<RequestRecord> {
        self.create_request_impl(req).await
    }

    async fn get_request_by_id(&self, id: i64) -> Result<Option<RequestRecord>> {
        self.get_request_by_id_impl(id).await
    }

    async fn find_open_request(
        &self,
        requester_id: i64,
        allocation_id: i64,
        request_type: &str,
    ) -> Result<Option<RequestRecord>> {
        self.find_open_request_impl(requester_id, allocation_id, request_type)
            .await
    }

    async fn list_open_requests(
        &self,
        allocation_id: Option<i64>,
        requester_id: Option<i64>,
    ) -> Result<Vec<RequestRecord>> {
        self.list_open_requests_impl(allocation_id, requester_id)
            .await
    }

    async fn decide_request(
        &self,
        id: i64,
        decision: RequestDecision,
    ) -> Result<Option<RequestRecord>> {
        self.decide_request_impl(id, decision).await
    }
}
