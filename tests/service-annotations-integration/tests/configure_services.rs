//! 配置方法端到端测试：上下文参数、配置注入与错误信息

use config::Config;
use di_impl::ServiceCollection;
use service_annotations::{
    annotate, AddAnnotatedServices, AmbiguousMatch, Annotated, Catalog, ConfigureServices, ErrorCode, Injectable,
    MethodDescriptor, ServiceRegistry, ServiceRegistryExt, ServiceResolverExt, TypeDescriptor,
};
use std::any::type_name;
use std::error::Error as _;
use std::sync::Arc;

#[derive(Debug)]
pub struct HttpSettings {
    base_address: String,
}

#[derive(Injectable)]
pub struct GitHubClient {
    settings: Arc<HttpSettings>,
}

#[annotate(service(transient), configure_services("register_dependencies"))]
impl GitHubClient {
    pub fn endpoint(&self) -> &str {
        &self.settings.base_address
    }

    fn register_dependencies(services: &dyn ServiceRegistry, config: &Config) -> Result<(), config::ConfigError> {
        let base_address = config.get_string("endpoint")?;
        services.add_instance(Arc::new(HttpSettings { base_address }));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region(String);

pub struct Regional;

#[annotate(configure_services)]
impl Regional {
    fn configure_services(services: Arc<ServiceCollection>, region: Region) {
        services.add_instance(Arc::new(region));
    }
}

pub struct NoHook;

#[annotate(configure_services)]
impl NoHook {}

pub struct CustomNameMissing;

#[annotate(configure_services("custom_name"))]
impl CustomNameMissing {
    pub fn configure_services(_services: &dyn ServiceRegistry) {}
}

pub struct InstanceHook;

#[annotate(configure_services)]
impl InstanceHook {
    pub fn configure_services(&self, _services: &dyn ServiceRegistry) {}
}

pub struct SplitImpl;

#[annotate(configure_services)]
impl SplitImpl {}

impl SplitImpl {
    pub fn configure_services(_services: &dyn ServiceRegistry) {}
}

pub struct FailingHook;

#[annotate(configure_services)]
impl FailingHook {
    fn configure_services(config: &Config) -> Result<(), config::ConfigError> {
        config.get_string("missing_key").map(drop)
    }
}

fn seeded_config() -> Config {
    Config::builder()
        .set_override("endpoint", "https://github.com/")
        .and_then(|builder| builder.build())
        .unwrap()
}

#[test]
fn test_hook_reads_seeded_configuration() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services_with(&Catalog::new("http").with::<GitHubClient>(), |context| {
            context.add(Arc::new(seeded_config()));
        })
        .unwrap();

    assert_eq!(services.len(), 2);
    let client = services.build_service_provider().get::<GitHubClient>().unwrap();
    assert_eq!(client.endpoint(), "https://github.com/");
}

#[test]
fn test_shared_and_cloned_parameters() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services_with(&Catalog::new("regional").with::<Regional>(), |context| {
            context.add(Arc::new(Region("eu-west".to_string())));
        })
        .unwrap();

    let region = services.build_service_provider().get::<Region>().unwrap();
    assert_eq!(*region, Region("eu-west".to_string()));
}

#[test]
fn test_default_method_not_found() {
    let error = ServiceCollection::shared()
        .add_annotated_services(&Catalog::new("no-hook").with::<NoHook>())
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::MethodNotFound);
    assert_eq!(error.code().as_str(), "SA2000");
    assert_eq!(
        error.description(),
        "Configure services method not found by name: \"configure_services\" (default)"
    );
    assert_eq!(error.tip(), "Make sure the method exists and is static");
    assert!(error.source().is_none());
}

#[test]
fn test_custom_method_not_found() {
    let error = ServiceCollection::shared()
        .add_annotated_services(&Catalog::new("custom").with::<CustomNameMissing>())
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::MethodNotFound);
    assert_eq!(
        error.description(),
        "Configure services method not found by name: \"custom_name\""
    );
    assert!(error.source().is_none());
}

#[test]
fn test_hook_outside_annotated_impl_is_not_found() {
    let error = ServiceCollection::shared()
        .add_annotated_services(&Catalog::new("split").with::<SplitImpl>())
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::MethodNotFound);
    assert!(<SplitImpl as Annotated>::type_descriptor().methods().is_empty());
}

#[test]
fn test_instance_method_is_not_found() {
    let error = ServiceCollection::shared()
        .add_annotated_services(&Catalog::new("instance").with::<InstanceHook>())
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::MethodNotFound);
    assert_eq!(
        error.description(),
        "Configure services method not found by name: \"configure_services\" (default)"
    );
}

#[test]
fn test_ambiguous_method_name() {
    let overloaded = TypeDescriptor::of::<NoHook>()
        .annotate(ConfigureServices::new())
        .method(MethodDescriptor::associated("configure_services").parameter::<dyn ServiceRegistry>("services"))
        .method(
            MethodDescriptor::associated("configure_services")
                .parameter::<dyn ServiceRegistry>("services")
                .parameter::<Region>("whatever"),
        );

    let error = ServiceCollection::shared()
        .add_annotated_services(&Catalog::new("overloaded").with_type(overloaded))
        .unwrap_err();

    assert_eq!(error.code().as_str(), "SA2001");
    assert_eq!(
        error.description(),
        "Ambiguous configure services method name: \"configure_services\" (default)"
    );
    assert_eq!(
        error.tip(),
        "Make sure the method name is unique, in other words doesn't have overloads"
    );
    assert!(error.source().unwrap().downcast_ref::<AmbiguousMatch>().is_some());
}

#[test]
fn test_parameter_not_provided() {
    let error = ServiceCollection::shared()
        .add_annotated_services(&Catalog::new("http").with::<GitHubClient>())
        .unwrap_err();

    let config = type_name::<Config>();
    let client = type_name::<GitHubClient>();
    assert_eq!(error.code().as_str(), "SA2002");
    assert_eq!(
        error.description(),
        format!(
            "The instance of {config} was not provided. \
             Required for parameter config in {client}::register_dependencies"
        )
    );
    assert_eq!(
        error.tip(),
        format!(
            "Make sure to add instance to annotation context. \
             For example services.add_annotated_services_with(&catalog, \
             |context| {{ context.add::<{config}>(instance); }})"
        )
    );
    assert!(error.source().is_none());
}

#[test]
fn test_failing_hook_reports_invocation_failure() {
    let services = ServiceCollection::shared();
    let error = services
        .add_annotated_services_with(&Catalog::new("failing").with::<FailingHook>(), |context| {
            context.add(Arc::new(seeded_config()));
        })
        .unwrap_err();

    assert_eq!(error.code().as_str(), "SA2003");
    assert_eq!(
        error.description(),
        format!(
            "Configure services method failed: {}::configure_services",
            type_name::<FailingHook>()
        )
    );
    assert!(error.source().unwrap().downcast_ref::<config::ConfigError>().is_some());
    assert!(services.is_empty());
}

#[test]
fn test_context_is_rebuilt_per_scan() {
    let services = ServiceCollection::shared();
    let catalog = Catalog::new("http").with::<GitHubClient>();

    services
        .add_annotated_services_with(&catalog, |context| {
            context.add(Arc::new(seeded_config()));
        })
        .unwrap();
    let error = services.add_annotated_services(&catalog).unwrap_err();

    assert_eq!(error.code(), ErrorCode::ParameterNotProvided);
    assert_eq!(services.len(), 3);
}
