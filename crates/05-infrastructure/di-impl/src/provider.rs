//! 服务提供者与作用域

use di_abstractions::{Instance, ResolveContext, ServiceDescriptor, ServiceResolver};
use infrastructure_common::{DependencyError, DependencyResult, Lifetime, TypeInfo};
use parking_lot::Mutex;
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 按注册记录下标缓存的实例
type InstanceCache = Mutex<HashMap<usize, Instance>>;

/// 提供者共享状态
struct ProviderState {
    /// 注册记录快照
    descriptors: Vec<ServiceDescriptor>,
    /// 服务类型到最后一条注册记录的下标
    last_registration: HashMap<TypeId, usize>,
    /// 单例缓存
    singletons: InstanceCache,
}

/// 服务提供者
///
/// 根提供者同时充当根作用域
pub struct ServiceProvider {
    state: Arc<ProviderState>,
    root_scope: InstanceCache,
}

impl ServiceProvider {
    /// 基于注册记录快照创建提供者
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        let last_registration = descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| (descriptor.service_type().info().id(), index))
            .collect();

        Self {
            state: Arc::new(ProviderState {
                descriptors,
                last_registration,
                singletons: Mutex::new(HashMap::new()),
            }),
            root_scope: Mutex::new(HashMap::new()),
        }
    }

    /// 创建新作用域
    pub fn create_scope(&self) -> ServiceScope {
        ServiceScope {
            state: self.state.clone(),
            scoped: Mutex::new(HashMap::new()),
        }
    }

    /// 注册记录数量
    pub fn len(&self) -> usize {
        self.state.descriptors.len()
    }

    /// 是否没有注册记录
    pub fn is_empty(&self) -> bool {
        self.state.descriptors.is_empty()
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.state, &self.root_scope)
    }
}

impl ServiceResolver for ServiceProvider {
    fn resolve_instance(&self, service_type: &TypeInfo) -> DependencyResult<Instance> {
        self.resolver().resolve_instance(service_type)
    }

    fn resolve(&self, service_type: &TypeInfo) -> DependencyResult<Instance> {
        self.resolver().resolve(service_type)
    }

    fn can_resolve(&self, service_type: &TypeInfo) -> bool {
        self.state.last_registration.contains_key(&service_type.id())
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("descriptors", &self.state.descriptors.len())
            .finish()
    }
}

/// 服务作用域
///
/// 作用域内共享 `Scoped` 实例，单例与根提供者共享
pub struct ServiceScope {
    state: Arc<ProviderState>,
    scoped: InstanceCache,
}

impl ServiceResolver for ServiceScope {
    fn resolve_instance(&self, service_type: &TypeInfo) -> DependencyResult<Instance> {
        Resolver::new(&self.state, &self.scoped).resolve_instance(service_type)
    }

    fn resolve(&self, service_type: &TypeInfo) -> DependencyResult<Instance> {
        Resolver::new(&self.state, &self.scoped).resolve(service_type)
    }

    fn can_resolve(&self, service_type: &TypeInfo) -> bool {
        self.state.last_registration.contains_key(&service_type.id())
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("scoped_instances", &self.scoped.lock().len())
            .finish()
    }
}

/// 一次顶层解析的解析器，激活函数和工厂的嵌套解析共享同一条解析链
struct Resolver<'a> {
    state: &'a ProviderState,
    scoped: &'a InstanceCache,
    context: RefCell<ResolveContext>,
}

impl<'a> Resolver<'a> {
    fn new(state: &'a ProviderState, scoped: &'a InstanceCache) -> Self {
        Self {
            state,
            scoped,
            context: RefCell::new(ResolveContext::new()),
        }
    }

    fn registration(&self, service_type: &TypeInfo) -> DependencyResult<(usize, &'a ServiceDescriptor)> {
        let index = *self
            .state
            .last_registration
            .get(&service_type.id())
            .ok_or_else(|| DependencyError::not_registered(service_type.name()))?;
        Ok((index, &self.state.descriptors[index]))
    }

    fn create(&self, service_type: &TypeInfo, descriptor: &ServiceDescriptor) -> DependencyResult<Instance> {
        self.context.borrow_mut().push_type(*service_type)?;
        let created = descriptor.create_instance(self);
        self.context.borrow_mut().pop_type();
        created
    }

    fn cached(
        &self,
        cache: &InstanceCache,
        index: usize,
        service_type: &TypeInfo,
        descriptor: &ServiceDescriptor,
    ) -> DependencyResult<Instance> {
        if let Some(instance) = cache.lock().get(&index) {
            return Ok(instance.clone());
        }

        // 构造期间不持有锁，嵌套解析可能再次访问同一缓存
        let created = self.create(service_type, descriptor)?;
        debug!("创建 {} 实例: {}", descriptor.lifetime(), service_type.name());
        Ok(cache.lock().entry(index).or_insert(created).clone())
    }
}

impl ServiceResolver for Resolver<'_> {
    fn resolve_instance(&self, service_type: &TypeInfo) -> DependencyResult<Instance> {
        let (index, descriptor) = self.registration(service_type)?;
        match descriptor.lifetime() {
            Lifetime::Transient => self.create(service_type, descriptor),
            Lifetime::Scoped => self.cached(self.scoped, index, service_type, descriptor),
            Lifetime::Singleton => self.cached(&self.state.singletons, index, service_type, descriptor),
        }
    }

    fn resolve(&self, service_type: &TypeInfo) -> DependencyResult<Instance> {
        let (_, descriptor) = self.registration(service_type)?;
        let instance = self.resolve_instance(service_type)?;
        descriptor.view(&instance)
    }

    fn can_resolve(&self, service_type: &TypeInfo) -> bool {
        self.state.last_registration.contains_key(&service_type.id())
    }
}
