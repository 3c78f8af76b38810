//! 服务注册集合

use crate::provider::ServiceProvider;
use di_abstractions::{ServiceDescriptor, ServiceRegistry};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 服务注册集合
///
/// 注册记录按追加顺序保存；通过 `Arc` 共享时可在多个位置继续追加
#[derive(Default)]
pub struct ServiceCollection {
    descriptors: RwLock<Vec<ServiceDescriptor>>,
}

impl ServiceCollection {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建以 `Arc` 共享的空集合
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// 第一条注册记录
    pub fn first(&self) -> Option<ServiceDescriptor> {
        self.descriptors.read().first().cloned()
    }

    /// 最后一条注册记录
    pub fn last(&self) -> Option<ServiceDescriptor> {
        self.descriptors.read().last().cloned()
    }

    /// 清空所有注册记录
    pub fn clear(&self) {
        self.descriptors.write().clear();
    }

    /// 基于当前注册记录的快照构建服务提供者
    pub fn build_service_provider(&self) -> ServiceProvider {
        ServiceProvider::new(self.descriptors())
    }
}

impl ServiceRegistry for ServiceCollection {
    fn add(&self, descriptor: ServiceDescriptor) {
        debug!(
            "添加注册记录: {} ({})",
            descriptor.service_type().name(),
            descriptor.lifetime()
        );
        self.descriptors.write().push(descriptor);
    }

    fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.descriptors.read().clone()
    }

    fn len(&self) -> usize {
        self.descriptors.read().len()
    }
}

impl fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("descriptors", &*self.descriptors.read())
            .finish()
    }
}
