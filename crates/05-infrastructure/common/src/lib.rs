//! # Infrastructure Common
//!
//! 这个 crate 提供了服务注解引擎各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 稳定的类型标识（`TypeId` + 完整类型名）
//! - [`Lifetime`] - 服务生命周期
//! - [`DependencyError`] - 依赖容器错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的精确类型匹配
//! - 同步、一次性的装配过程

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
