use async_trait::async_trait;
use oxifac::{Container, ContainerBuilder, DiError, DiResult, Injectable};
use std::sync::Arc;

// ===== Fixtures =====

struct Multiplier {
    factor: i32,
}

struct Offset {
    amount: i32,
}

#[async_trait]
impl Injectable for Offset {
    async fn construct(_scope: &Container) -> DiResult<Self> {
        Ok(Offset { amount: 3 })
    }
}

struct Calculator {
    multiplier: Arc<Multiplier>,
    offset: Arc<Offset>,
}

#[async_trait]
impl Injectable for Calculator {
    async fn construct(scope: &Container) -> DiResult<Self> {
        Ok(Calculator {
            multiplier: scope.resolve::<Multiplier>().await?,
            offset: scope.resolve::<Offset>().await?,
        })
    }
}

impl Calculator {
    fn apply(&self, n: i32) -> i32 {
        n * self.multiplier.factor + self.offset.amount
    }
}

// ===== Resolution =====

#[tokio::test]
async fn resolves_constructed_dependency_chain() {
    let mut builder = ContainerBuilder::new();
    builder.register_instance(Multiplier { factor: 2 });
    builder.register_class::<Offset>();
    builder.register_class::<Calculator>();

    let container = builder.build().unwrap();
    let calc = container.resolve::<Calculator>().await.unwrap();
    assert_eq!(calc.apply(1), 5);
}

#[tokio::test]
async fn registered_instance_resolves_to_same_arc() {
    let mut builder = ContainerBuilder::new();
    builder.register_instance(Multiplier { factor: 7 });

    let container = builder.build().unwrap();
    let a = container.resolve::<Multiplier>().await.unwrap();
    let b = container.resolve::<Multiplier>().await.unwrap();
    assert_eq!(a.factor, 7);
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn unregistered_type_fails_with_not_registered() {
    let container = ContainerBuilder::new().build().unwrap();
    match container.resolve::<Calculator>().await {
        Err(DiError::NotRegistered(name)) => {
            assert!(name.contains("Calculator"), "got name {:?}", name);
        }
        other => panic!("expected NotRegistered, got {:?}", other.map(|_| ())),
    }
}

// ===== Interface registration =====

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[async_trait]
impl Injectable for English {
    async fn construct(_scope: &Container) -> DiResult<Self> {
        Ok(English)
    }
}

#[tokio::test]
async fn class_registered_as_interface_resolves_by_trait() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_class::<English>()
        .as_interface::<dyn Greeter>(|c| c)
        .single_instance();

    let container = builder.build().unwrap();
    let greeter = container.resolve_trait::<dyn Greeter>().await.unwrap();
    assert_eq!(greeter.greet(), "hello");

    // The concrete key was replaced, not duplicated.
    assert!(matches!(
        container.resolve::<English>().await,
        Err(DiError::NotRegistered(_))
    ));
}

#[tokio::test]
async fn instance_registered_as_interface_resolves_by_trait() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_instance(English)
        .as_interface::<dyn Greeter>(|c| c);

    let container = builder.build().unwrap();
    let a = container.resolve_trait::<dyn Greeter>().await.unwrap();
    let b = container.resolve_trait::<dyn Greeter>().await.unwrap();
    assert_eq!(a.greet(), "hello");
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn trait_resolution_shares_one_underlying_instance() {
    struct Counting;

    impl Greeter for Counting {
        fn greet(&self) -> String {
            format!("{:p}", self as *const _)
        }
    }

    #[async_trait]
    impl Injectable for Counting {
        async fn construct(_scope: &Container) -> DiResult<Self> {
            Ok(Counting)
        }
    }

    let mut builder = ContainerBuilder::new();
    builder
        .register_class::<Counting>()
        .as_interface::<dyn Greeter>(|c| c)
        .single_instance();

    let container = builder.build().unwrap();
    let a = container.resolve_trait::<dyn Greeter>().await.unwrap();
    let b = container.resolve_trait::<dyn Greeter>().await.unwrap();
    assert_eq!(a.greet(), b.greet());
}

// ===== Ad-hoc instances =====

#[tokio::test]
async fn add_instance_resolves_without_registration() {
    let container = ContainerBuilder::new().build().unwrap();
    container.add_instance(Multiplier { factor: 9 }).unwrap();

    let got = container.resolve::<Multiplier>().await.unwrap();
    assert_eq!(got.factor, 9);
}

#[tokio::test]
async fn add_instance_rejects_cache_collision() {
    let container = ContainerBuilder::new().build().unwrap();
    container.add_instance(Multiplier { factor: 1 }).unwrap();

    match container.add_instance(Multiplier { factor: 2 }) {
        Err(DiError::AlreadyRegistered(name)) => {
            assert!(name.contains("Multiplier"));
        }
        other => panic!("expected AlreadyRegistered, got {:?}", other),
    }
}

#[tokio::test]
async fn add_instance_rejects_registration_collision() {
    let mut builder = ContainerBuilder::new();
    builder.register_class::<Offset>();

    let container = builder.build().unwrap();
    assert!(matches!(
        container.add_instance(Offset { amount: 0 }),
        Err(DiError::AlreadyRegistered(_))
    ));
}

#[tokio::test]
async fn add_instance_trait_resolves_by_trait() {
    let container = ContainerBuilder::new().build().unwrap();
    container
        .add_instance_trait::<dyn Greeter>(Arc::new(English))
        .unwrap();

    let greeter = container.resolve_trait::<dyn Greeter>().await.unwrap();
    assert_eq!(greeter.greet(), "hello");
}
