use di_impl::ServiceCollection;
use service_annotations::{
    add_annotated_services, annotate, Injectable, ServiceRegistry, ServiceRegistryExt, ServiceResolverExt,
};
use std::sync::Arc;

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct Name(String);

#[derive(Injectable)]
pub struct Formal {
    name: Option<Arc<Name>>,
}

#[annotate(service(singleton, use_as(dyn Greeter, Self)), configure_services)]
impl Formal {
    fn configure_services(services: &dyn ServiceRegistry, name: Name) {
        services.add_instance(Arc::new(name));
    }
}

impl Greeter for Formal {
    fn greet(&self) -> String {
        let name = self.name.as_ref().map_or("stranger", |name| name.0.as_str());
        format!("good day, {name}")
    }
}

fn main() {
    let services = ServiceCollection::shared();
    add_annotated_services!(services, |context| {
        context.add(Arc::new(Name("Ada".to_string())));
    })
    .unwrap();

    let provider = services.build_service_provider();
    assert_eq!(provider.get::<dyn Greeter>().unwrap().greet(), "good day, Ada");
}
