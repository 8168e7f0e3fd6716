//! Assignment Portal - 作业提交与评分后端服务
//!
//! 基于 Actix Web 构建：学生匿名提交作业文件，管理员查看、评分并导出成绩报表。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），用于令牌注销和管理员信息缓存
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（提交、评分、扩展名策略、报表、实时推送）
//! - `storage`: 数据存储层（SeaORM + 本地文件）
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
