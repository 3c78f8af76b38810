//! 注解分发
//!
//! 扫描目录中的每个类型，按声明顺序对目标容器执行其注解。
//! 第一个失败的注解立即中止扫描，已经写入容器的注册不会回滚。

use crate::annotation::ServiceAnnotation;
use crate::catalog::TypeCatalog;
use crate::context::{AnnotationContext, AnnotationContextBuilder};
use crate::descriptor::TypeDescriptor;
use crate::error::ServiceAnnotationError;
use di_abstractions::ServiceRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// 按目录顺序展开 (类型, 注解) 对
pub fn scan<'a>(
    catalog: &'a dyn TypeCatalog,
) -> impl Iterator<Item = (&'a TypeDescriptor, &'a dyn ServiceAnnotation)> + 'a {
    catalog.types().iter().flat_map(|descriptor| {
        descriptor
            .annotations()
            .iter()
            .map(move |annotation| (descriptor, annotation.as_ref()))
    })
}

/// 对目录中的所有注解执行注册，返回执行的注解数量
pub fn apply_annotations(
    catalog: &dyn TypeCatalog,
    context: &AnnotationContext,
) -> Result<usize, ServiceAnnotationError> {
    info!(
        "开始扫描服务注解: {} ({} 个类型)",
        catalog.name(),
        catalog.types().len()
    );

    let mut applied = 0;
    for (descriptor, annotation) in scan(catalog) {
        debug!("应用注解: {} -> {}", annotation.kind(), descriptor.name());
        annotation.apply(descriptor, context)?;
        applied += 1;
    }

    info!(
        "服务注解扫描完成: {} (应用 {} 个注解, 容器共 {} 条注册)",
        catalog.name(),
        applied,
        context.target_container().len()
    );
    Ok(applied)
}

/// 容器的注解注册扩展
pub trait AddAnnotatedServices: Sized {
    /// 扫描目录并注册，上下文只包含目标容器
    fn add_annotated_services(&self, catalog: &dyn TypeCatalog) -> Result<&Self, ServiceAnnotationError> {
        self.add_annotated_services_with(catalog, |_| {})
    }

    /// 扫描目录并注册，扫描前通过回调向上下文添加实例
    fn add_annotated_services_with<F>(
        &self,
        catalog: &dyn TypeCatalog,
        configure_context: F,
    ) -> Result<&Self, ServiceAnnotationError>
    where
        F: FnOnce(&mut AnnotationContextBuilder);
}

impl<C: ServiceRegistry> AddAnnotatedServices for Arc<C> {
    fn add_annotated_services_with<F>(
        &self,
        catalog: &dyn TypeCatalog,
        configure_context: F,
    ) -> Result<&Self, ServiceAnnotationError>
    where
        F: FnOnce(&mut AnnotationContextBuilder),
    {
        let mut builder = AnnotationContextBuilder::new(self);
        configure_context(&mut builder);
        apply_annotations(catalog, &builder.build())?;
        Ok(self)
    }
}

impl AddAnnotatedServices for Arc<dyn ServiceRegistry> {
    fn add_annotated_services_with<F>(
        &self,
        catalog: &dyn TypeCatalog,
        configure_context: F,
    ) -> Result<&Self, ServiceAnnotationError>
    where
        F: FnOnce(&mut AnnotationContextBuilder),
    {
        let mut builder = AnnotationContextBuilder::from_registry(self.clone());
        configure_context(&mut builder);
        apply_annotations(catalog, &builder.build())?;
        Ok(self)
    }
}

/// 扫描调用方 crate 中由 `#[annotate]` 声明的类型并注册
///
/// ```ignore
/// add_annotated_services!(services)?;
/// add_annotated_services!(services, |context| {
///     context.add(Arc::new(settings));
/// })?;
/// ```
#[macro_export]
macro_rules! add_annotated_services {
    ($services:expr) => {
        $crate::AddAnnotatedServices::add_annotated_services(
            &$services,
            &$crate::Catalog::of_crate(env!("CARGO_CRATE_NAME")),
        )
    };
    ($services:expr, $configure_context:expr) => {
        $crate::AddAnnotatedServices::add_annotated_services_with(
            &$services,
            &$crate::Catalog::of_crate(env!("CARGO_CRATE_NAME")),
            $configure_context,
        )
    };
}
