#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database};

use lms_server::models::users::entities::{User, UserProfile, UserRole};
use lms_server::models::users::requests::CreateUserRequest;
use lms_server::services::system::DynamicConfig;
use lms_server::storage::{SeaOrmStorage, Storage};
use lms_server::utils::jwt::JwtUtils;
use lms_server::utils::password::hash_password;

pub const PASSWORD: &str = "Campus2024";

/// 每个测试独占一个临时 SQLite 文件，结束时删除
pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    db_path: PathBuf,
    db_url: String,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

pub async fn setup() -> TestContext {
    // 支付结果固定为成功
    setup_with(&[("payment.simulated_success_rate", "1")]).await
}

/// 在数据库默认设置之上覆盖部分动态设置
pub async fn setup_with(overrides: &[(&str, &str)]) -> TestContext {
    let db_path = std::env::temp_dir().join(format!(
        "lms-test-{}.db",
        uuid::Uuid::new_v4().simple()
    ));
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::connect(&db_url)
            .await
            .expect("temporary database should open"),
    );

    let mut settings: Vec<(String, String)> = storage
        .list_all_settings()
        .await
        .expect("default settings should be seeded")
        .into_iter()
        .map(|s| (s.key, s.value))
        .collect();
    settings.extend(
        overrides
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string())),
    );
    DynamicConfig::init(settings).await;

    TestContext {
        storage,
        db_path,
        db_url,
    }
}

impl TestContext {
    /// 绕过存储层直接执行 SQL，用于制造后端故障
    pub async fn execute_sql(&self, sql: &str) {
        let db = Database::connect(&self.db_url)
            .await
            .expect("second connection should open");
        db.execute_unprepared(sql).await.expect("sql should run");
        db.close().await.expect("connection should close");
    }

    pub async fn create_user(&self, username: &str, role: UserRole) -> User {
        self.storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@campus.test"),
                password: hash_password(PASSWORD).expect("hash"),
                role,
                profile: UserProfile {
                    profile_name: username.to_string(),
                    avatar_url: None,
                },
            })
            .await
            .expect("user should be created")
    }

    /// 创建用户并返回 (用户, Bearer 头)
    pub async fn login_as(&self, username: &str, role: UserRole) -> (User, String) {
        let user = self.create_user(username, role).await;
        let token = JwtUtils::generate_access_token(user.id, role).expect("token");
        (user, format!("Bearer {token}"))
    }
}

/// 按生产配置组装应用，只替换存储
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(lms_server::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(lms_server::utils::query_error_handler),
                )
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .configure(lms_server::routes::configure_routes),
        )
        .await
    };
}
