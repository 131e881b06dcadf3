//! # Navigation
//!
//! Hierarchical coordinators and the opaque modules that carry them.
//!
//! A feature is delivered as a [`Module<R>`]: a coordinator, already wired to
//! its view-model's outputs by a [`ModuleBuilder`], whose concrete type is
//! hidden from whoever builds it. Starting the module moves the coordinator
//! from [`CoordinatorState::Idle`] to [`CoordinatorState::Active`] and returns a
//! [`Running<R>`] handle for its single eventual result.
//!
//! ```text
//! parent reaction ── build_module ──▶ Module<R> ── start_child ──▶ child host task
//!        ▲                                                               │
//!        └───────────────────── on_result(R) ◀── complete(R) ────────────┘
//! ```
//!
//! Each started coordinator runs on its own host task inside a [`Scope`] that
//! is a child of its parent's. Reactions run one at a time in emission order;
//! cancelling a scope cancels every coordinator below it without delivering
//! their results.
//!
//! Presentation goes through [`PresentationSurface`] handles. [`Stage`] is the
//! headless view hierarchy used by the shell and by tests.

mod builder;
mod coordinator;
mod error;
mod flow;
mod module;
mod scope;
mod stage;
mod state;
mod surface;
#[cfg(feature = "testing")]
pub mod testing;
mod view_model;

pub use builder::{BuilderRef, ModuleBuilder, resolve_builder, resolve_module};
pub use coordinator::{Bindings, ChildReaction, ChildSummary, Coordinator, Navigator, Reaction};
pub use error::{NavigationError, NavigationErrorExt};
pub use flow::{FlowManager, downcast_flow};
pub use module::{Module, ModuleId, Running};
pub use scope::Scope;
pub use stage::{Stage, Transition};
pub use state::CoordinatorState;
pub use surface::{PresentationSurface, Route, Screen, SurfaceHost, SurfaceId, SurfaceRef};
pub use view_model::ViewModel;
