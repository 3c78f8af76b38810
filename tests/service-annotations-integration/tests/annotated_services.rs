//! 服务注解端到端测试：注册记录、生命周期共享与声明顺序

use di_impl::ServiceCollection;
use service_annotations::{
    add_annotated_services, annotate, AddAnnotatedServices, Catalog, Injectable, Lifetime, ServiceRegistry,
    ServiceRegistryExt, ServiceResolverExt, TypeInfo,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

pub trait Farewell: Send + Sync {
    fn farewell(&self) -> String;
}

pub trait Counter: Send + Sync {
    fn next(&self) -> usize;
}

#[derive(Injectable)]
pub struct Plain;

#[annotate(service(transient))]
impl Plain {}

#[derive(Injectable)]
pub struct English {
    greetings: AtomicUsize,
}

#[annotate(service(singleton, use_as(dyn Greeter, Self, dyn Farewell)))]
impl English {
    pub fn greetings(&self) -> usize {
        self.greetings.load(Ordering::SeqCst)
    }
}

impl Greeter for English {
    fn greet(&self) -> String {
        self.greetings.fetch_add(1, Ordering::SeqCst);
        "hello".to_string()
    }
}

impl Farewell for English {
    fn farewell(&self) -> String {
        "bye".to_string()
    }
}

#[derive(Injectable)]
pub struct Visits {
    count: AtomicUsize,
}

#[annotate(service(scoped, use_as(dyn Counter)))]
impl Visits {}

impl Counter for Visits {
    fn next(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Injectable)]
pub struct Helper;

#[derive(Injectable)]
pub struct ServiceFirst;

#[annotate(service(transient), configure_services)]
impl ServiceFirst {
    fn configure_services(services: &dyn ServiceRegistry) {
        services.add_transient::<Helper>();
    }
}

#[derive(Injectable)]
pub struct ConfigureFirst;

#[annotate(configure_services("register_helper"), service(transient))]
impl ConfigureFirst {
    fn register_helper(services: &ServiceCollection) {
        services.add_transient::<Helper>();
    }
}

#[derive(Injectable)]
pub struct Greeting {
    greeter: Arc<dyn Greeter>,
    counter: Option<Arc<dyn Counter>>,
}

#[annotate(service)]
impl Greeting {
    pub fn render(&self) -> String {
        let visit = self.counter.as_ref().map_or(0, |counter| counter.next());
        format!("{} #{visit}", self.greeter.greet())
    }
}

fn service_types(services: &ServiceCollection) -> Vec<TypeInfo> {
    services
        .descriptors()
        .iter()
        .map(|descriptor| *descriptor.service_type().info())
        .collect()
}

#[test]
fn test_single_transient_registration() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services(&Catalog::new("plain").with::<Plain>())
        .unwrap();

    let descriptors = services.descriptors();
    assert_eq!(descriptors.len(), 1);
    assert!(descriptors[0].service_type().info().is::<Plain>());
    assert!(descriptors[0].implementation_type().unwrap().info().is::<Plain>());
    assert_eq!(descriptors[0].lifetime(), Lifetime::Transient);
}

#[test]
fn test_singleton_aliases_resolve_same_instance() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services(&Catalog::new("english").with::<English>())
        .unwrap();

    assert_eq!(
        service_types(&services),
        vec![
            TypeInfo::of::<English>(),
            TypeInfo::of::<dyn Greeter>(),
            TypeInfo::of::<dyn Farewell>()
        ]
    );

    let provider = services.build_service_provider();
    let greeter = provider.get::<dyn Greeter>().unwrap();
    let english = provider.get::<English>().unwrap();

    assert_eq!(greeter.greet(), "hello");
    assert_eq!(english.greetings(), 1);
    assert_eq!(provider.get::<dyn Farewell>().unwrap().farewell(), "bye");
    assert_eq!(
        Arc::as_ptr(&greeter).cast::<u8>(),
        Arc::as_ptr(&english).cast::<u8>()
    );
}

#[test]
fn test_scoped_alias_without_self_is_primary() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services(&Catalog::new("visits").with::<Visits>())
        .unwrap();

    assert_eq!(service_types(&services), vec![TypeInfo::of::<dyn Counter>()]);
    assert!(!services.contains::<Visits>());

    let provider = services.build_service_provider();
    let scope = provider.create_scope();
    assert_eq!(scope.get::<dyn Counter>().unwrap().next(), 1);
    assert_eq!(scope.get::<dyn Counter>().unwrap().next(), 2);

    let other_scope = provider.create_scope();
    assert_eq!(other_scope.get::<dyn Counter>().unwrap().next(), 1);
}

#[test]
fn test_service_then_configure_follows_declaration_order() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services(&Catalog::new("mixed").with::<ServiceFirst>())
        .unwrap();

    assert_eq!(services.len(), 2);
    assert!(services.first().unwrap().service_type().info().is::<ServiceFirst>());
    assert!(services.last().unwrap().service_type().info().is::<Helper>());
}

#[test]
fn test_configure_then_service_follows_declaration_order() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services(&Catalog::new("mixed").with::<ConfigureFirst>())
        .unwrap();

    assert_eq!(services.len(), 2);
    assert!(services.first().unwrap().service_type().info().is::<Helper>());
    assert!(services.last().unwrap().service_type().info().is::<ConfigureFirst>());
}

#[test]
fn test_injected_dependencies_use_alias_registrations() {
    let services = ServiceCollection::shared();
    services
        .add_annotated_services(
            &Catalog::new("greeting")
                .with::<English>()
                .with::<Visits>()
                .with::<Greeting>(),
        )
        .unwrap();

    let provider = services.build_service_provider();
    let scope = provider.create_scope();
    let greeting = scope.get::<Greeting>().unwrap();

    assert_eq!(greeting.render(), "hello #1");
    assert_eq!(provider.get::<English>().unwrap().greetings(), 1);
}

#[test]
fn test_crate_catalog_scans_in_declaration_order() {
    let services = ServiceCollection::shared();

    let returned = add_annotated_services!(services).unwrap();

    assert!(Arc::ptr_eq(returned, &services));
    assert_eq!(
        service_types(&services),
        vec![
            TypeInfo::of::<Plain>(),
            TypeInfo::of::<English>(),
            TypeInfo::of::<dyn Greeter>(),
            TypeInfo::of::<dyn Farewell>(),
            TypeInfo::of::<dyn Counter>(),
            TypeInfo::of::<ServiceFirst>(),
            TypeInfo::of::<Helper>(),
            TypeInfo::of::<Helper>(),
            TypeInfo::of::<ConfigureFirst>(),
            TypeInfo::of::<Greeting>(),
        ]
    );
}

#[test]
fn test_repeated_scans_accumulate_records() {
    let services = ServiceCollection::shared();
    let catalog = Catalog::new("plain").with::<Plain>();

    services
        .add_annotated_services(&catalog)
        .and_then(|services| services.add_annotated_services(&catalog))
        .unwrap();

    assert_eq!(services.len(), 2);
}
