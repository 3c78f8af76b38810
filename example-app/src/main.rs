//! # 示例应用程序
//!
//! 演示如何通过注解把服务注册到依赖容器：加载配置，播种注解上下文，
//! 扫描本 crate 中声明的注解，然后解析服务。

mod api;

use anyhow::Context as _;
use api::ResponseFactory;
use clap::Parser;
use config::{Config, Environment, File};
use di_impl::ServiceCollection;
use service_annotations::{add_annotated_services, ServiceRegistry, ServiceResolverExt};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "服务注解示例应用")]
struct Args {
    /// 配置文件路径（不含扩展名时按支持的格式查找）
    #[arg(short, long, default_value = "config/app")]
    config: String,

    /// 日志过滤规则，未设置 RUST_LOG 时使用
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 覆盖端点地址
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("启动服务注解示例应用");

    let configuration = load_configuration(&args)?;

    let services = ServiceCollection::shared();
    add_annotated_services!(services, |context| {
        context.add(Arc::new(configuration));
    })
    .context("注册注解服务失败")?;
    info!("容器共 {} 条注册", services.len());

    let provider = services.build_service_provider();
    let response = provider
        .get::<dyn ResponseFactory>()
        .context("解析响应服务失败")?
        .create_response();

    info!("响应消息: {}", response.message);
    info!("端点地址: {}", response.base_address);
    Ok(())
}

/// 加载配置：配置文件（可选）、`APP__` 前缀的环境变量、命令行覆盖
fn load_configuration(args: &Args) -> anyhow::Result<Config> {
    let mut builder = Config::builder()
        .add_source(File::with_name(&args.config).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    if let Some(endpoint) = &args.endpoint {
        builder = builder.set_override("endpoints.my_endpoint", endpoint.as_str())?;
    }

    builder.build().context("加载配置失败")
}
