use async_trait::async_trait;
use oxifac::{Container, ContainerBuilder, DiResult, Factory, Injectable};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct BuildCount(AtomicUsize);

struct Widget {
    serial: usize,
}

#[async_trait]
impl Injectable for Widget {
    async fn construct(scope: &Container) -> DiResult<Self> {
        let count = scope.resolve::<BuildCount>().await?;
        Ok(Widget {
            serial: count.0.fetch_add(1, Ordering::SeqCst),
        })
    }
}

fn widget_builder() -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    builder.register_instance(BuildCount(AtomicUsize::new(0)));
    builder
}

#[tokio::test]
async fn binding_a_factory_constructs_nothing() {
    let mut builder = widget_builder();
    builder.register_class::<Widget>().single_instance();

    let container = builder.build().unwrap();
    let factory = container.factory::<Widget>();

    let count = container.resolve::<BuildCount>().await.unwrap();
    assert_eq!(count.0.load(Ordering::SeqCst), 0);

    let widget = factory.create().await.unwrap();
    assert_eq!(widget.serial, 0);
    assert_eq!(count.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn factory_of_always_new_mints_a_fresh_instance_per_call() {
    let mut builder = widget_builder();
    builder.register_class::<Widget>().always_new();

    let container = builder.build().unwrap();
    let factory = container.factory::<Widget>();

    let a = factory.create().await.unwrap();
    let b = factory.create().await.unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_ne!(a.serial, b.serial);
}

#[tokio::test]
async fn factory_of_cached_lifetime_shares_with_direct_resolution() {
    let mut builder = widget_builder();
    builder.register_class::<Widget>().per_scope();

    let container = builder.build().unwrap();
    let factory = container.factory::<Widget>();

    let from_factory = factory.create().await.unwrap();
    let direct = container.resolve::<Widget>().await.unwrap();
    assert!(Arc::ptr_eq(&from_factory, &direct));
}

#[tokio::test]
async fn factory_is_bound_to_the_scope_that_produced_it() {
    let mut builder = widget_builder();
    builder.register_class::<Widget>().per_scope();

    let root = builder.build().unwrap();
    let nested = root.create_nested();

    let root_widget = root.factory::<Widget>().create().await.unwrap();
    let nested_widget = nested.factory::<Widget>().create().await.unwrap();
    assert!(!Arc::ptr_eq(&root_widget, &nested_widget));
}

// A consumer can depend on Factory<T> instead of T to defer the edge.

struct LazyConsumer {
    widgets: Factory<Widget>,
}

#[async_trait]
impl Injectable for LazyConsumer {
    async fn construct(scope: &Container) -> DiResult<Self> {
        Ok(LazyConsumer {
            widgets: scope.factory::<Widget>(),
        })
    }
}

#[tokio::test]
async fn injected_factory_defers_construction_past_the_consumer() {
    let mut builder = widget_builder();
    builder.register_class::<Widget>().always_new();
    builder.register_class::<LazyConsumer>();

    let container = builder.build().unwrap();
    let consumer = container.resolve::<LazyConsumer>().await.unwrap();

    let count = container.resolve::<BuildCount>().await.unwrap();
    assert_eq!(count.0.load(Ordering::SeqCst), 0);

    let widget = consumer.widgets.create().await.unwrap();
    assert_eq!(widget.serial, 0);
    assert_eq!(count.0.load(Ordering::SeqCst), 1);
}
