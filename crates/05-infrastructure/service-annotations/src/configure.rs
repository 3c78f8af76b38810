//! 容器配置注解

use crate::annotation::ServiceAnnotation;
use crate::context::AnnotationContext;
use crate::descriptor::{Arguments, MethodDescriptor, TypeDescriptor};
use crate::error::{AmbiguousMatch, ServiceAnnotationError};
use tracing::debug;

/// 默认配置方法名称
pub const DEFAULT_METHOD_NAME: &str = "configure_services";

/// 容器配置注解
///
/// 在声明类型上按名称查找唯一的静态方法，从注解上下文中按参数类型
/// 取得实参后调用它。同名的实例方法不参与查找。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureServices {
    method_name: String,
}

impl ConfigureServices {
    /// 使用默认方法名称 `configure_services`
    pub fn new() -> Self {
        Self::named(DEFAULT_METHOD_NAME)
    }

    /// 使用自定义方法名称
    pub fn named(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
        }
    }

    /// 配置方法名称
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// 是否为默认名称
    pub fn is_default_name(&self) -> bool {
        self.method_name == DEFAULT_METHOD_NAME
    }

    fn find_method<'a>(
        &self,
        implementation_type: &'a TypeDescriptor,
    ) -> Result<&'a MethodDescriptor, ServiceAnnotationError> {
        let candidates: Vec<&MethodDescriptor> = implementation_type
            .methods_named(&self.method_name)
            .filter(|method| method.is_static())
            .collect();

        match candidates.as_slice() {
            [] => Err(ServiceAnnotationError::method_not_found(
                &self.method_name,
                self.is_default_name(),
            )),
            [method] => Ok(*method),
            _ => Err(ServiceAnnotationError::ambiguous_method(
                &self.method_name,
                self.is_default_name(),
                AmbiguousMatch {
                    type_name: implementation_type.name().to_string(),
                    method_name: self.method_name.clone(),
                    candidates: candidates.len(),
                },
            )),
        }
    }

    fn resolve_arguments(
        &self,
        implementation_type: &TypeDescriptor,
        method: &MethodDescriptor,
        context: &AnnotationContext,
    ) -> Result<Arguments, ServiceAnnotationError> {
        method
            .parameters()
            .iter()
            .map(|parameter| {
                context.get_service(parameter.type_info()).ok_or_else(|| {
                    ServiceAnnotationError::parameter_not_provided(
                        parameter.type_info().name(),
                        parameter.name(),
                        implementation_type.name(),
                        method.name(),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Arguments::new)
    }
}

impl Default for ConfigureServices {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceAnnotation for ConfigureServices {
    fn kind(&self) -> &'static str {
        "configure_services"
    }

    fn apply(
        &self,
        implementation_type: &TypeDescriptor,
        context: &AnnotationContext,
    ) -> Result<(), ServiceAnnotationError> {
        let method = self.find_method(implementation_type)?;
        let arguments = self.resolve_arguments(implementation_type, method, context)?;

        debug!(
            "调用配置方法: {}::{} ({} 个参数)",
            implementation_type.name(),
            method.name(),
            arguments.len()
        );
        method.invoke(&arguments).map_err(|source| {
            ServiceAnnotationError::invocation_failed(implementation_type.name(), method.name(), source)
        })
    }
}
