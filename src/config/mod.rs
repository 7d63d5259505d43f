//! 配置管理
//!
//! 配置来源依次为 `config.toml`、`config.{APP_ENV}.toml`、`TEACHALLOC_` 前缀环境变量以及少量约定俗成的环境变量。

mod r#impl;
mod structs;

pub use structs::*;
