//! # 依赖注入具体实现
//!
//! 提供服务注册集合、服务提供者与作用域的参考实现。
//!
//! - [`ServiceCollection`] 按调用顺序累积注册记录
//! - [`ServiceProvider`] 对注册记录的快照进行解析，最后一条注册优先
//! - [`ServiceScope`] 在作用域内共享 `Scoped` 实例，与根提供者共享单例

mod collection;
mod provider;

pub use collection::ServiceCollection;
pub use provider::{ServiceProvider, ServiceScope};
