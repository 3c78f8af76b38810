//! 注解上下文
//!
//! 以精确类型为键的实例表，用于满足配置方法的参数。
//! 通过 [`AnnotationContextBuilder`] 构建，`build` 得到不可变快照。

use di_abstractions::{downcast_instance, into_instance, Instance, ServiceRegistry};
use infrastructure_common::TypeInfo;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 注解上下文
#[derive(Clone)]
pub struct AnnotationContext {
    target_container: Arc<dyn ServiceRegistry>,
    instances: HashMap<TypeInfo, Instance>,
}

impl AnnotationContext {
    /// 目标容器
    pub fn target_container(&self) -> &Arc<dyn ServiceRegistry> {
        &self.target_container
    }

    /// 按精确类型查找实例，不存在时返回 None
    pub fn get_service(&self, service_type: &TypeInfo) -> Option<Instance> {
        self.instances.get(service_type).cloned()
    }

    /// 类型化查找
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_service(&TypeInfo::of::<T>())
            .and_then(|instance| downcast_instance::<T>(&instance))
    }

    /// 是否包含指定类型
    pub fn contains(&self, service_type: &TypeInfo) -> bool {
        self.instances.contains_key(service_type)
    }

    /// 实例数量
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl fmt::Debug for AnnotationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationContext")
            .field("instances", &self.instances.keys().map(TypeInfo::name).collect::<Vec<_>>())
            .finish()
    }
}

/// 注解上下文构建器
///
/// 初始包含两条记录：`dyn ServiceRegistry` 与容器的具体类型，都指向目标容器
pub struct AnnotationContextBuilder {
    target_container: Arc<dyn ServiceRegistry>,
    instances: HashMap<TypeInfo, Instance>,
}

impl AnnotationContextBuilder {
    /// 以目标容器创建构建器
    pub fn new<C: ServiceRegistry>(container: &Arc<C>) -> Self {
        let mut builder = Self::from_registry(container.clone());
        builder
            .instances
            .insert(TypeInfo::of::<C>(), into_instance(container.clone()));
        builder
    }

    /// 以类型擦除的目标容器创建构建器
    ///
    /// 具体类型未知，只登记 `dyn ServiceRegistry` 一条记录。
    pub fn from_registry(target_container: Arc<dyn ServiceRegistry>) -> Self {
        let mut instances = HashMap::new();
        instances.insert(TypeInfo::of::<dyn ServiceRegistry>(), into_instance(target_container.clone()));

        Self {
            target_container,
            instances,
        }
    }

    /// 以类型 `T` 为键添加实例，已存在时覆盖
    ///
    /// 只能以同一个 `T` 取回；实现的其他 trait 或具体类型不会被登记。
    pub fn add<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.instances.insert(TypeInfo::of::<T>(), into_instance(instance));
        self
    }

    /// 构建上下文快照，之后的 `add` 不影响已构建的上下文
    pub fn build(&self) -> AnnotationContext {
        AnnotationContext {
            target_container: self.target_container.clone(),
            instances: self.instances.clone(),
        }
    }
}

impl fmt::Debug for AnnotationContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationContextBuilder")
            .field("instances", &self.instances.len())
            .finish()
    }
}
