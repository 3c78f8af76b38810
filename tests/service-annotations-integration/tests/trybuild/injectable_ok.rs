use service_annotations::{Injectable, ServiceRegistryExt, ServiceResolverExt};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

#[derive(Injectable)]
pub struct Clock;

#[derive(Injectable)]
pub struct Stopwatch(Arc<Clock>, AtomicUsize);

#[derive(Injectable)]
pub struct Timer {
    clock: Arc<Clock>,
    stopwatch: Option<Arc<Stopwatch>>,
    ticks: Vec<u64>,
}

fn main() {
    let services = di_impl::ServiceCollection::shared();
    services.add_singleton::<Clock>().add_transient::<Timer>();

    let timer = services.build_service_provider().get::<Timer>().unwrap();
    assert!(timer.stopwatch.is_none());
    assert!(timer.ticks.is_empty());
    let _ = &timer.clock;
}
