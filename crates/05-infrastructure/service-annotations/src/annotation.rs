//! 注解能力接口

use crate::context::AnnotationContext;
use crate::descriptor::TypeDescriptor;
use crate::error::ServiceAnnotationError;
use std::fmt::Debug;

/// 服务注解 trait
///
/// 声明在类型上的标记，扫描时按声明顺序对目标容器执行 `apply`。
/// 实例在目录构建时创建，之后不可变。
pub trait ServiceAnnotation: Send + Sync + Debug {
    /// 注解种类，用于日志
    fn kind(&self) -> &'static str;

    /// 对声明该注解的类型执行注册或配置
    fn apply(
        &self,
        implementation_type: &TypeDescriptor,
        context: &AnnotationContext,
    ) -> Result<(), ServiceAnnotationError>;
}
