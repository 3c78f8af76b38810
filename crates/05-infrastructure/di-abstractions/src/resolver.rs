//! 依赖解析器抽象接口
//!
//! 提供按类型解析实例的能力

use crate::factory::{downcast_instance, Instance};
use infrastructure_common::{DependencyError, DependencyResult, TypeInfo};
use std::sync::Arc;

/// 依赖解析器 trait
///
/// 由容器实现，供激活函数和工厂在构造时解析依赖
pub trait ServiceResolver {
    /// 解析服务类型最后一条注册记录产出的具体实例
    fn resolve_instance(&self, service_type: &TypeInfo) -> DependencyResult<Instance>;

    /// 解析服务类型的实例（已转换为服务类型）
    fn resolve(&self, service_type: &TypeInfo) -> DependencyResult<Instance>;

    /// 检查是否可以解析指定类型
    fn can_resolve(&self, service_type: &TypeInfo) -> bool;
}

/// 类型化解析扩展
pub trait ServiceResolverExt: ServiceResolver {
    /// 解析指定类型的服务
    fn get<S>(&self) -> DependencyResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let service_type = TypeInfo::of::<S>();
        let instance = self.resolve(&service_type)?;
        downcast_instance::<S>(&instance).ok_or_else(|| {
            DependencyError::resolution_failed(service_type.name(), "解析结果无法转换为请求的类型")
        })
    }

    /// 解析指定类型的服务，未注册时返回 None
    fn get_optional<S>(&self) -> DependencyResult<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        if self.can_resolve(&TypeInfo::of::<S>()) {
            self.get::<S>().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<R: ServiceResolver + ?Sized> ServiceResolverExt for R {}

/// 解析上下文
///
/// 记录当前解析链，用于检测循环依赖
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链
    pub resolution_chain: Vec<TypeInfo>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::with_options(ResolveOptions::default())
    }

    /// 使用指定选项创建解析上下文
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, service_type: TypeInfo) -> DependencyResult<()> {
        if self.resolution_chain.contains(&service_type) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: self.describe_chain(&service_type),
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::resolution_failed(
                service_type.name(),
                format!("超过最大解析深度 {}", self.options.max_depth),
            ));
        }
        self.resolution_chain.push(service_type);
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    fn describe_chain(&self, closing: &TypeInfo) -> String {
        self.resolution_chain
            .iter()
            .chain(std::iter::once(closing))
            .map(TypeInfo::name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}
