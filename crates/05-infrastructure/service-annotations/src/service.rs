//! 服务注册注解

use crate::annotation::ServiceAnnotation;
use crate::context::AnnotationContext;
use crate::descriptor::TypeDescriptor;
use crate::error::ServiceAnnotationError;
use di_abstractions::{ServiceDescriptor, ServiceFactory, ServiceType};
use infrastructure_common::Lifetime;
use tracing::debug;

/// 服务注册注解
///
/// 把声明它的类型注册到目标容器。`use_as` 为空或包含类型自身时，
/// 类型自身是主服务类型；否则第一个声明的别名成为主服务类型。
/// 主服务类型得到唯一一条类型到类型的注册，其余别名注册为
/// 通过容器解析主服务类型的工厂。
#[derive(Debug, Clone)]
pub struct Service {
    lifetime: Lifetime,
    use_as: Vec<ServiceType>,
}

impl Service {
    /// 以指定生命周期创建
    pub fn new(lifetime: Lifetime) -> Self {
        Self {
            lifetime,
            use_as: Vec::new(),
        }
    }

    /// 瞬时服务
    pub fn transient() -> Self {
        Self::new(Lifetime::Transient)
    }

    /// 作用域服务
    pub fn scoped() -> Self {
        Self::new(Lifetime::Scoped)
    }

    /// 单例服务
    pub fn singleton() -> Self {
        Self::new(Lifetime::Singleton)
    }

    /// 追加服务类型别名，重复的类型保留第一次出现的位置
    pub fn use_as(mut self, service_type: ServiceType) -> Self {
        if !self.use_as.contains(&service_type) {
            self.use_as.push(service_type);
        }
        self
    }

    /// 把类型自身加入别名
    pub fn use_self<T: Send + Sync + 'static>(self) -> Self {
        self.use_as(ServiceType::of::<T>())
    }

    /// 生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 按声明顺序排列的别名
    pub fn aliases(&self) -> &[ServiceType] {
        &self.use_as
    }

    /// 选择主服务类型
    fn primary_type(&self, implementation_type: &TypeDescriptor) -> ServiceType {
        let implementation = implementation_type.implementation_type();
        match self.use_as.first() {
            Some(first) if !self.use_as.iter().any(|alias| alias.info() == implementation.info()) => {
                first.clone()
            }
            _ => implementation.as_service_type().clone(),
        }
    }
}

impl ServiceAnnotation for Service {
    fn kind(&self) -> &'static str {
        "service"
    }

    fn apply(
        &self,
        implementation_type: &TypeDescriptor,
        context: &AnnotationContext,
    ) -> Result<(), ServiceAnnotationError> {
        let container = context.target_container();
        let primary_type = self.primary_type(implementation_type);

        debug!(
            "注册服务: {} -> {} ({})",
            primary_type.name(),
            implementation_type.name(),
            self.lifetime
        );
        container.add(ServiceDescriptor::with_implementation(
            primary_type.clone(),
            implementation_type.implementation_type().clone(),
            self.lifetime,
        ));

        for mapped_type in self.use_as.iter().filter(|alias| **alias != primary_type) {
            let primary = *primary_type.info();
            debug!("注册服务别名: {} -> {}", mapped_type.name(), primary.name());
            container.add(ServiceDescriptor::with_factory(
                mapped_type.clone(),
                self.lifetime,
                ServiceFactory::new(move |resolver| resolver.resolve_instance(&primary)),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AnnotationContextBuilder;
    use di_abstractions::{Injectable, ServiceRegistry, ServiceResolver, ServiceResolverExt};
    use di_impl::ServiceCollection;
    use infrastructure_common::{DependencyResult, TypeInfo};
    use std::sync::Arc;

    trait Reader: Send + Sync {
        fn read(&self) -> &'static str;
    }

    trait Writer: Send + Sync {}

    #[derive(Debug)]
    struct FileStore;

    impl Injectable for FileStore {
        fn inject(_: &dyn ServiceResolver) -> DependencyResult<Self> {
            Ok(Self)
        }
    }

    impl Reader for FileStore {
        fn read(&self) -> &'static str {
            "file"
        }
    }

    impl Writer for FileStore {}

    fn reader() -> ServiceType {
        ServiceType::alias::<FileStore, dyn Reader>(|it: Arc<FileStore>| -> Arc<dyn Reader> { it })
    }

    fn writer() -> ServiceType {
        ServiceType::alias::<FileStore, dyn Writer>(|it: Arc<FileStore>| -> Arc<dyn Writer> { it })
    }

    fn apply(service: &Service) -> Arc<ServiceCollection> {
        let services = ServiceCollection::shared();
        let context = AnnotationContextBuilder::new(&services).build();
        service
            .apply(&TypeDescriptor::injectable::<FileStore>(), &context)
            .unwrap();
        services
    }

    fn service_types(services: &ServiceCollection) -> Vec<TypeInfo> {
        services
            .descriptors()
            .iter()
            .map(|descriptor| *descriptor.service_type().info())
            .collect()
    }

    #[test]
    fn test_without_aliases_registers_implementation_type() {
        let services = apply(&Service::scoped());

        let descriptors = services.descriptors();
        assert_eq!(descriptors.len(), 1);
        assert!(descriptors[0].service_type().info().is::<FileStore>());
        assert!(descriptors[0].implementation_type().unwrap().info().is::<FileStore>());
        assert_eq!(descriptors[0].lifetime(), Lifetime::Scoped);
    }

    #[test]
    fn test_aliases_including_self_keep_self_as_primary() {
        let service = Service::singleton()
            .use_as(reader())
            .use_as(ServiceType::of::<FileStore>())
            .use_as(writer());
        let services = apply(&service);

        let descriptors = services.descriptors();
        assert_eq!(
            service_types(&services),
            vec![
                TypeInfo::of::<FileStore>(),
                TypeInfo::of::<dyn Reader>(),
                TypeInfo::of::<dyn Writer>()
            ]
        );
        assert!(descriptors[0].implementation_type().is_some());
        assert!(descriptors[1].factory().is_some());
        assert!(descriptors[2].factory().is_some());
        assert!(descriptors.iter().all(|descriptor| descriptor.lifetime() == Lifetime::Singleton));
    }

    #[test]
    fn test_first_alias_becomes_primary_when_self_missing() {
        let services = apply(&Service::transient().use_as(writer()).use_as(reader()));

        let descriptors = services.descriptors();
        assert_eq!(
            service_types(&services),
            vec![TypeInfo::of::<dyn Writer>(), TypeInfo::of::<dyn Reader>()]
        );
        assert!(descriptors[0].implementation_type().unwrap().info().is::<FileStore>());
        assert!(descriptors[1].factory().is_some());
    }

    #[test]
    fn test_duplicate_aliases_are_ignored() {
        let service = Service::transient().use_as(reader()).use_as(reader());

        assert_eq!(service.aliases().len(), 1);
        assert_eq!(apply(&service).len(), 1);
    }

    #[test]
    fn test_alias_factories_share_singleton_instance() {
        let services = apply(&Service::singleton().use_self::<FileStore>().use_as(reader()));
        let provider = services.build_service_provider();

        let reader = provider.get::<dyn Reader>().unwrap();
        let store = provider.get::<FileStore>().unwrap();
        assert_eq!(reader.read(), "file");
        assert_eq!(
            Arc::as_ptr(&reader).cast::<u8>(),
            Arc::as_ptr(&store).cast::<u8>()
        );
    }

    #[test]
    fn test_scoped_alias_shares_instance_within_scope() {
        let services = apply(&Service::scoped().use_as(reader()).use_self::<FileStore>());
        let provider = services.build_service_provider();

        let scope = provider.create_scope();
        let reader = scope.get::<dyn Reader>().unwrap();
        let store = scope.get::<FileStore>().unwrap();
        assert_eq!(
            Arc::as_ptr(&reader).cast::<u8>(),
            Arc::as_ptr(&store).cast::<u8>()
        );

        let other_scope = provider.create_scope();
        let other = other_scope.get::<FileStore>().unwrap();
        assert_ne!(Arc::as_ptr(&other).cast::<u8>(), Arc::as_ptr(&store).cast::<u8>());
    }

    #[test]
    fn test_transient_alias_factories_resolve_independently() {
        let services = apply(&Service::transient().use_as(reader()).use_as(writer()));
        let provider = services.build_service_provider();

        let first = provider.get::<dyn Writer>().unwrap();
        let second = provider.get::<dyn Writer>().unwrap();
        assert_ne!(Arc::as_ptr(&first).cast::<u8>(), Arc::as_ptr(&second).cast::<u8>());
        assert_eq!(provider.get::<dyn Reader>().unwrap().read(), "file");
    }
}
