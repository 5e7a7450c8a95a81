//! 静态配置
//!
//! `config.toml` → `config.{APP_ENV}.toml` → `LMS_*` 环境变量，逐层覆盖。
//! 运行期可变的部分见 [`crate::services::system::DynamicConfig`]。

mod r#impl;
mod structs;

pub use structs::*;
