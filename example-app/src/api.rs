//! 示例服务
//!
//! `MyService` 注册为单例，并通过自己的配置方法注册它依赖的 HTTP 端点设置

use config::Config;
use serde::Deserialize;
use service_annotations::{annotate, Injectable, ServiceRegistry, ServiceRegistryExt};
use std::sync::Arc;
use tracing::debug;

/// 端点配置
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointSettings {
    /// 服务地址
    pub my_endpoint: String,
    /// 超时秒数
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

/// 服务响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyResponse {
    pub message: String,
    pub base_address: String,
}

/// 响应服务接口
pub trait ResponseFactory: Send + Sync {
    fn create_response(&self) -> MyResponse;
}

/// 示例服务
#[derive(Injectable)]
pub struct MyService {
    endpoint: Arc<EndpointSettings>,
}

#[annotate(
    service(singleton, use_as(dyn ResponseFactory, Self)),
    configure_services("register_endpoint")
)]
impl MyService {
    fn register_endpoint(services: &dyn ServiceRegistry, config: &Config) -> Result<(), config::ConfigError> {
        let endpoint: EndpointSettings = config.get("endpoints")?;
        debug!("注册端点配置: {}", endpoint.my_endpoint);
        services.add_instance(Arc::new(endpoint));
        Ok(())
    }
}

impl ResponseFactory for MyService {
    fn create_response(&self) -> MyResponse {
        MyResponse {
            message: format!(
                "Response created by my service, which registered its own endpoint settings (timeout {}s)",
                self.endpoint.timeout_secs
            ),
            base_address: self.endpoint.my_endpoint.clone(),
        }
    }
}
