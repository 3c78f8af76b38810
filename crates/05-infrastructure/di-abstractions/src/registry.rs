//! 服务注册表抽象接口

use crate::descriptor::{ImplementationType, ServiceDescriptor, ServiceType};
use crate::factory::{Injectable, ServiceFactory};
use crate::resolver::ServiceResolver;
use infrastructure_common::{DependencyResult, Lifetime, TypeInfo};
use std::sync::Arc;

/// 服务注册表 trait
///
/// 接收注册记录的依赖容器。注册按调用顺序累积，实现需要内部可变性，
/// 以便在注解上下文中以共享引用的形式传递。
pub trait ServiceRegistry: Send + Sync + 'static {
    /// 追加注册记录
    fn add(&self, descriptor: ServiceDescriptor);

    /// 按注册顺序获取所有注册记录
    fn descriptors(&self) -> Vec<ServiceDescriptor>;

    /// 注册记录数量
    fn len(&self) -> usize {
        self.descriptors().len()
    }

    /// 是否没有任何注册记录
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 类型化注册扩展
///
/// 对所有注册表（包括 `dyn ServiceRegistry`）可用
pub trait ServiceRegistryExt: ServiceRegistry {
    /// 以指定生命周期注册实现类型
    fn add_service<T: Injectable>(&self, lifetime: Lifetime) -> &Self {
        self.add(ServiceDescriptor::with_implementation(
            ServiceType::of::<T>(),
            ImplementationType::of::<T>(),
            lifetime,
        ));
        self
    }

    /// 注册瞬时服务
    fn add_transient<T: Injectable>(&self) -> &Self {
        self.add_service::<T>(Lifetime::Transient)
    }

    /// 注册作用域服务
    fn add_scoped<T: Injectable>(&self) -> &Self {
        self.add_service::<T>(Lifetime::Scoped)
    }

    /// 注册单例服务
    fn add_singleton<T: Injectable>(&self) -> &Self {
        self.add_service::<T>(Lifetime::Singleton)
    }

    /// 以服务类型 `S` 注册实现类型 `T`
    fn add_service_as<S, T>(&self, lifetime: Lifetime, upcast: fn(Arc<T>) -> Arc<S>) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        self.add(ServiceDescriptor::with_implementation(
            ServiceType::alias::<T, S>(upcast),
            ImplementationType::of::<T>(),
            lifetime,
        ));
        self
    }

    /// 以工厂函数注册服务
    fn add_factory<S, F>(&self, lifetime: Lifetime, factory_fn: F) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::with_factory(
            ServiceType::of::<S>(),
            lifetime,
            ServiceFactory::typed(factory_fn),
        ));
        self
    }

    /// 以工厂函数注册瞬时服务
    fn add_transient_with<S, F>(&self, factory_fn: F) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add_factory::<S, F>(Lifetime::Transient, factory_fn)
    }

    /// 以工厂函数注册作用域服务
    fn add_scoped_with<S, F>(&self, factory_fn: F) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add_factory::<S, F>(Lifetime::Scoped, factory_fn)
    }

    /// 以工厂函数注册单例服务
    fn add_singleton_with<S, F>(&self, factory_fn: F) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add_factory::<S, F>(Lifetime::Singleton, factory_fn)
    }

    /// 注册已有实例（单例）
    fn add_instance<S>(&self, instance: Arc<S>) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.add_factory::<S, _>(Lifetime::Singleton, move |_| Ok(instance.clone()))
    }

    /// 是否存在指定服务类型的注册
    fn contains<S: ?Sized + 'static>(&self) -> bool {
        self.contains_type(&TypeInfo::of::<S>())
    }

    /// 是否存在指定服务类型的注册（使用 TypeInfo）
    fn contains_type(&self, service_type: &TypeInfo) -> bool {
        self.descriptors()
            .iter()
            .any(|descriptor| descriptor.service_type().info() == service_type)
    }
}

impl<R: ServiceRegistry + ?Sized> ServiceRegistryExt for R {}
