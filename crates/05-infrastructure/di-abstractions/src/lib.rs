//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义注册记录和依赖解析的核心接口。
//! 注解引擎只产出注册记录，容器的存储与解析语义由实现层负责。
//!
//! ## 核心接口
//!
//! - [`ServiceDescriptor`] - 注册记录（服务类型、生命周期、实现类型或工厂）
//! - [`ServiceRegistry`] - 注册记录的容器接口
//! - [`ServiceResolver`] - 依赖解析器接口
//! - [`Injectable`] - 实现类型的构造约定

pub mod descriptor;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use descriptor::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
