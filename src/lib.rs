//! Campus LMS - 基于角色的学习管理系统后端
//!
//! 学生、讲师、院长与管理员共用一套 API，按角色提供不同的导航、权限和仪表盘数据。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 静态配置
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层与 PWA 前端外壳
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
