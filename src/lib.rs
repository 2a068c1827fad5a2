//! # oxifac
//!
//! Async dependency injection for Rust: builder-based registration, scoped
//! lifetimes, and a first-class resource lifecycle.
//!
//! ## Features
//!
//! - **Builder registration**: collect classes and instances with chainable
//!   proxies, then freeze them into an immutable container
//! - **Three lifetimes**: SingleInstance, PerScope, and AlwaysNew, routed
//!   through a hierarchy of nested scopes
//! - **Async construction**: dependencies are declared by implementing
//!   [`Injectable`], an async constructor resolving against the scope
//! - **Resource lifecycle**: opt-in `initialize`/`dispose` hooks with strict
//!   dependency-respecting (reverse creation) teardown order
//! - **Deferred factories**: [`Factory<T>`] breaks construction-order edges
//!   without constructing anything up front
//! - **Circular dependency detection**: resolution cycles fail fast with the
//!   full path in the error
//!
//! ## Quick Start
//!
//! ```rust
//! use oxifac::{Container, ContainerBuilder, DiResult, Injectable};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! #[async_trait]
//! impl Injectable for Database {
//!     async fn construct(_scope: &Container) -> DiResult<Self> {
//!         Ok(Database {
//!             connection_string: "postgres://localhost".to_string(),
//!         })
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! #[async_trait]
//! impl Injectable for UserService {
//!     async fn construct(scope: &Container) -> DiResult<Self> {
//!         Ok(UserService {
//!             db: scope.resolve::<Database>().await?,
//!         })
//!     }
//! }
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let mut builder = ContainerBuilder::new();
//! builder.register_class::<Database>().single_instance();
//! builder.register_class::<UserService>();
//!
//! let container = builder.build()?;
//! let users = container.resolve::<UserService>().await?;
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! # Ok::<_, oxifac::DiError>(())
//! # }).unwrap();
//! ```
//!
//! ## Lifetimes
//!
//! - **SingleInstance**: created once, shared by every scope in the hierarchy
//! - **PerScope**: created once per scope (the default; ideal for
//!   request-style work units)
//! - **AlwaysNew**: created fresh on every resolution
//!
//! Nested scopes come from [`Container::create_nested`]; a nested resolve of
//! a SingleInstance type delegates to the root, while PerScope state stays
//! isolated per scope.
//!
//! ## Interface Registration
//!
//! A class can be keyed by a trait it implements. The conversion is a plain
//! unsize coercion checked at compile time:
//!
//! ```rust
//! use oxifac::{Container, ContainerBuilder, DiResult, Injectable};
//! use async_trait::async_trait;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("[LOG] {}", message);
//!     }
//! }
//!
//! #[async_trait]
//! impl Injectable for ConsoleLogger {
//!     async fn construct(_scope: &Container) -> DiResult<Self> {
//!         Ok(ConsoleLogger)
//!     }
//! }
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .register_class::<ConsoleLogger>()
//!     .as_interface::<dyn Logger>(|c| c)
//!     .single_instance();
//!
//! let container = builder.build().unwrap();
//! let logger = container.resolve_trait::<dyn Logger>().await.unwrap();
//! logger.log("Hello, World!");
//! # });
//! ```
//!
//! Registering a class against a trait it does not implement is rejected by
//! the compiler, not at runtime:
//!
//! ```compile_fail
//! use oxifac::{Container, ContainerBuilder, DiResult, Injectable};
//! use async_trait::async_trait;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct NotALogger;
//!
//! #[async_trait]
//! impl Injectable for NotALogger {
//!     async fn construct(_scope: &Container) -> DiResult<Self> {
//!         Ok(NotALogger)
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .register_class::<NotALogger>()
//!     .as_interface::<dyn Logger>(|c| c);
//! ```
//!
//! ## Resource Lifecycle
//!
//! ```rust
//! use oxifac::{
//!     AsyncResource, Container, ContainerBuilder, DiError, DiResult, DisposeContext,
//!     Injectable, ResourceResult,
//! };
//! use async_trait::async_trait;
//!
//! struct Connection;
//!
//! #[async_trait]
//! impl Injectable for Connection {
//!     async fn construct(_scope: &Container) -> DiResult<Self> {
//!         Ok(Connection)
//!     }
//! }
//!
//! #[async_trait]
//! impl AsyncResource for Connection {
//!     async fn initialize(&self) -> ResourceResult {
//!         // open sockets, run handshakes...
//!         Ok(())
//!     }
//!
//!     async fn dispose(&self, _error: DisposeContext<'_>) -> ResourceResult {
//!         // flush and close
//!         Ok(())
//!     }
//! }
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .register_class::<Connection>()
//!     .single_instance()
//!     .as_resource();
//!
//! let container = builder.build()?;
//! container
//!     .using(|scope| async move {
//!         let _conn = scope.resolve::<Connection>().await?;
//!         Ok::<_, DiError>(())
//!     })
//!     .await?;
//! # Ok::<_, oxifac::DiError>(())
//! # }).unwrap();
//! ```

pub mod builder;
pub mod container;
pub mod error;
pub mod factory;
pub mod inject;
pub mod key;
pub mod lifetime;
pub mod resource;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use builder::{ClassRegistration, ContainerBuilder, InstanceRegistration};
pub use container::Container;
pub use error::{DiError, DiResult, ResourceResult};
pub use factory::Factory;
pub use inject::Injectable;
pub use key::{key_of, key_of_trait, Key};
pub use lifetime::Lifetime;
pub use resource::{AsyncResource, DisposeContext};
