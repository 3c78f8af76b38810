//! 注册记录
//!
//! 提供服务类型、实现类型与注册记录的定义

use crate::factory::{activate, downcast_instance, into_instance, Activator, Injectable, Instance, ServiceFactory};
use crate::resolver::ServiceResolver;
use infrastructure_common::{DependencyError, DependencyResult, Lifetime, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 服务视图函数：把注册产出的具体实例转换为服务类型的实例
pub type ServiceView = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// 服务类型
///
/// 解析键加上从具体实例到服务类型实例的转换
#[derive(Clone)]
pub struct ServiceType {
    info: TypeInfo,
    view: ServiceView,
}

impl ServiceType {
    /// 以类型自身作为服务类型
    pub fn of<S>() -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            info: TypeInfo::of::<S>(),
            view: Arc::new(|instance: &Instance| {
                instance.is::<Arc<S>>().then(|| instance.clone())
            }),
        }
    }

    /// 以实现类型 `I` 的上转型 `S` 作为服务类型（通常 `S` 是 `dyn Trait`）
    pub fn alias<I, S>(upcast: fn(Arc<I>) -> Arc<S>) -> Self
    where
        I: Send + Sync + 'static,
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            info: TypeInfo::of::<S>(),
            view: Arc::new(move |instance: &Instance| {
                if instance.is::<Arc<S>>() {
                    return Some(instance.clone());
                }
                downcast_instance::<I>(instance).map(|implementation| into_instance(upcast(implementation)))
            }),
        }
    }

    /// 类型信息
    pub fn info(&self) -> &TypeInfo {
        &self.info
    }

    /// 完整类型名称
    pub fn name(&self) -> &'static str {
        self.info.name()
    }

    /// 把具体实例转换为服务实例
    pub fn view(&self, instance: &Instance) -> Option<Instance> {
        (self.view)(instance)
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl Eq for ServiceType {}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceType").field(&self.info.name()).finish()
    }
}

/// 实现类型
#[derive(Clone)]
pub struct ImplementationType {
    service_type: ServiceType,
    activator: Option<Activator>,
}

impl ImplementationType {
    /// 可由容器构造的实现类型
    pub fn of<T: Injectable>() -> Self {
        Self {
            service_type: ServiceType::of::<T>(),
            activator: Some(activate::<T>),
        }
    }

    /// 没有构造约定的类型，只能作为标识使用
    pub fn opaque<T>() -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            service_type: ServiceType::of::<T>(),
            activator: None,
        }
    }

    /// 类型信息
    pub fn info(&self) -> &TypeInfo {
        self.service_type.info()
    }

    /// 以实现类型自身作为服务类型
    pub fn as_service_type(&self) -> &ServiceType {
        &self.service_type
    }

    /// 是否可以激活
    pub fn is_activatable(&self) -> bool {
        self.activator.is_some()
    }

    /// 构造实例
    pub fn activate(&self, resolver: &dyn ServiceResolver) -> DependencyResult<Instance> {
        let activator = self.activator.ok_or_else(|| {
            DependencyError::creation_failed(self.info().name(), "类型没有实现 Injectable，无法激活")
        })?;
        activator(resolver)
    }
}

impl PartialEq for ImplementationType {
    fn eq(&self, other: &Self) -> bool {
        self.info() == other.info()
    }
}

impl fmt::Debug for ImplementationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationType")
            .field("type", &self.info().name())
            .field("activatable", &self.is_activatable())
            .finish()
    }
}

/// 实现来源：实现类型或工厂，二者恰有其一
#[derive(Debug, Clone)]
pub enum ImplementationSource {
    /// 由实现类型直接构造
    Type(ImplementationType),
    /// 由工厂函数产出
    Factory(ServiceFactory),
}

/// 服务注册记录
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    service_type: ServiceType,
    lifetime: Lifetime,
    source: ImplementationSource,
}

impl ServiceDescriptor {
    /// 创建类型到类型的注册记录
    pub fn with_implementation(
        service_type: ServiceType,
        implementation_type: ImplementationType,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            service_type,
            lifetime,
            source: ImplementationSource::Type(implementation_type),
        }
    }

    /// 创建工厂注册记录
    pub fn with_factory(service_type: ServiceType, lifetime: Lifetime, factory: ServiceFactory) -> Self {
        Self {
            service_type,
            lifetime,
            source: ImplementationSource::Factory(factory),
        }
    }

    /// 服务类型
    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    /// 生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 实现来源
    pub fn source(&self) -> &ImplementationSource {
        &self.source
    }

    /// 实现类型（工厂注册时为 None）
    pub fn implementation_type(&self) -> Option<&ImplementationType> {
        match &self.source {
            ImplementationSource::Type(implementation_type) => Some(implementation_type),
            ImplementationSource::Factory(_) => None,
        }
    }

    /// 工厂（类型注册时为 None）
    pub fn factory(&self) -> Option<&ServiceFactory> {
        match &self.source {
            ImplementationSource::Type(_) => None,
            ImplementationSource::Factory(factory) => Some(factory),
        }
    }

    /// 产出具体实例（未经服务视图转换）
    pub fn create_instance(&self, resolver: &dyn ServiceResolver) -> DependencyResult<Instance> {
        match &self.source {
            ImplementationSource::Type(implementation_type) => implementation_type.activate(resolver),
            ImplementationSource::Factory(factory) => factory.create(resolver),
        }
    }

    /// 把具体实例转换为服务实例
    pub fn view(&self, instance: &Instance) -> DependencyResult<Instance> {
        self.service_type.view(instance).ok_or_else(|| {
            DependencyError::resolution_failed(self.service_type.name(), "实例类型与服务类型不匹配")
        })
    }
}
