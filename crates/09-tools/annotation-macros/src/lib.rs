//! # Annotation Macros
//!
//! 这个 crate 提供了声明服务注解的过程宏。生成的代码通过
//! `::service_annotations` 路径引用运行时类型，使用方只需依赖 `service-annotations`。
//!
//! ## 核心宏
//!
//! - [`annotate`] - 在固有 `impl` 块上声明注解，并在启动时登记到类型目录
//! - [`Injectable`] - 派生容器构造函数
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use service_annotations::{annotate, Injectable, ServiceRegistry, ServiceRegistryExt};
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! pub struct RandomSource;
//!
//! #[annotate(service(singleton, use_as(dyn Source, Self)), configure_services("register_random"))]
//! impl RandomSource {
//!     fn register_random(services: &dyn ServiceRegistry, settings: &Settings) {
//!         services.add_instance(Arc::new(Seed(settings.seed)));
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

mod annotate;
mod injectable;
mod utils;

/// 服务注解宏
///
/// 标注在非泛型的固有 `impl` 块上。括号内的每一项成为一个注解，顺序即声明顺序。
///
/// # 参数
///
/// - `service` / `service(transient | scoped | singleton, use_as(Type, ..))` - 注册到容器，默认瞬时
/// - `configure_services` / `configure_services("method")` - 调用静态配置方法，默认方法名 `configure_services`
///
/// `use_as` 中的 `Self` 表示类型自身。配置方法的参数可以是 `&T`、`Arc<T>`
/// 或可克隆的 `T`，`T` 即注解上下文中的查找键。
///
/// 只收集被标注的 `impl` 块中的函数。同一类型另一个固有 `impl` 块中的
/// 配置方法不会被找到，扫描时报告 SA2000。
///
/// # 示例
///
/// ```rust,ignore
/// #[annotate(service(scoped, use_as(dyn Greeter)))]
/// impl English {}
/// ```
#[proc_macro_attribute]
pub fn annotate(args: TokenStream, input: TokenStream) -> TokenStream {
    let item_impl = parse_macro_input!(input as ItemImpl);
    annotate::annotate_impl(args, item_impl)
}

/// 可注入组件派生宏
///
/// `Arc<T>` 字段通过容器解析，`Option<Arc<T>>` 字段在未注册时为 `None`，
/// 其余字段使用 `Default`。
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Injectable)]
/// pub struct Greeting {
///     greeter: Arc<dyn Greeter>,
///     clock: Option<Arc<Clock>>,
///     visits: AtomicUsize,
/// }
/// ```
#[proc_macro_derive(Injectable)]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
}
