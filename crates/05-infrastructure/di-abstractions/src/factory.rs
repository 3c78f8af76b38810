//! 实例与工厂
//!
//! 容器内所有实例都以 `Arc<dyn Any + Send + Sync>` 擦除存放，
//! 内部装着 `Arc<T>`，因此 `T` 可以是 `dyn Trait` 这样的非 Sized 类型。

use crate::resolver::ServiceResolver;
use infrastructure_common::DependencyResult;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 擦除后的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 激活函数：通过解析器构造实现类型的实例
pub type Activator = fn(&dyn ServiceResolver) -> DependencyResult<Instance>;

/// 把 `Arc<T>` 包装为擦除实例
pub fn into_instance<T>(value: Arc<T>) -> Instance
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

/// 从擦除实例中取回 `Arc<T>`
pub fn downcast_instance<T>(instance: &Instance) -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance.downcast_ref::<Arc<T>>().cloned()
}

/// 可注入组件 trait
///
/// 带有注册注解的实现类型通过此 trait 由容器构造
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 使用解析器构建组件实例
    fn inject(resolver: &dyn ServiceResolver) -> DependencyResult<Self>;
}

/// 构造 `T` 并包装为擦除实例
pub fn activate<T: Injectable>(resolver: &dyn ServiceResolver) -> DependencyResult<Instance> {
    T::inject(resolver).map(|value| into_instance(Arc::new(value)))
}

/// 服务工厂
///
/// 以容器为输入产出实例
#[derive(Clone)]
pub struct ServiceFactory {
    factory_fn: Arc<dyn Fn(&dyn ServiceResolver) -> DependencyResult<Instance> + Send + Sync>,
}

impl ServiceFactory {
    /// 包装工厂函数
    pub fn new<F>(factory_fn: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        Self {
            factory_fn: Arc::new(factory_fn),
        }
    }

    /// 由返回 `Arc<S>` 的类型化函数创建工厂
    pub fn typed<S, F>(factory_fn: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        Self::new(move |resolver| factory_fn(resolver).map(into_instance))
    }

    /// 创建实例
    pub fn create(&self, resolver: &dyn ServiceResolver) -> DependencyResult<Instance> {
        (self.factory_fn)(resolver)
    }
}

impl fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceFactory(<function>)")
    }
}
