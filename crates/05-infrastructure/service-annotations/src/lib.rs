//! # Service Annotations
//!
//! 元数据驱动的服务注册引擎。类型通过注解声明自己应当如何注册到依赖容器，
//! 引擎扫描类型目录，按声明顺序执行每个注解，把注册记录写入目标容器。
//!
//! ## 核心类型
//!
//! - [`Service`] - 以生命周期和服务类型别名注册实现类型
//! - [`ConfigureServices`] - 调用类型上的静态配置方法，参数从注解上下文取得
//! - [`AnnotationContext`] - 按精确类型匹配的实例存储，满足配置方法的参数
//! - [`Catalog`] - 一次扫描所覆盖的类型集合
//! - [`AddAnnotatedServices`] - 容器上的扫描入口
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use service_annotations::{add_annotated_services, annotate, Injectable};
//! use di_impl::ServiceCollection;
//! use std::sync::Arc;
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Injectable)]
//! pub struct English;
//!
//! #[annotate(service(singleton, use_as(dyn Greeter, Self)))]
//! impl English {}
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let services = ServiceCollection::shared();
//! add_annotated_services!(services)?;
//! ```

extern crate self as service_annotations;

pub mod annotation;
pub mod catalog;
pub mod configure;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod service;

pub use annotation::*;
pub use catalog::*;
pub use configure::*;
pub use context::*;
pub use descriptor::*;
pub use dispatcher::*;
pub use error::*;
pub use service::*;

pub use annotation_macros::{annotate, Injectable};
pub use di_abstractions::{
    downcast_instance, Injectable, Instance, ServiceRegistry, ServiceRegistryExt, ServiceResolver,
    ServiceResolverExt, ServiceType,
};
pub use infrastructure_common::{DependencyError, DependencyResult, Lifetime, TypeInfo};

/// 宏展开所需的内部路径
#[doc(hidden)]
pub mod __private {
    pub use ctor::ctor;
    pub use di_abstractions::ImplementationType;
}
