//! Lazy dynamic dispatch into optional vendor libraries.
//!
//! A vendor library (CUPTI, the CUDA driver, roctracer, ...) is described by an
//! [`ExternLib`] implementation. [`Dispatch`] loads it on first use, resolves
//! individual symbols on demand and caches both for the rest of the process.
//! [`define_dispatch!`] stamps out one typed wrapper per vendor entry point.
//!
//! Nothing here links against the vendor library at build time, so a host can
//! run without the profiling backend and detect its absence through
//! [`DispatchError`].

pub mod dispatch;
pub mod error;
pub mod extern_lib;
pub mod loader;
mod macros;
pub mod slot;

pub use dispatch::Dispatch;
pub use error::DispatchError;
pub use extern_lib::{ExternLib, ModuleOf};
pub use loader::{DynamicLoader, ModuleLoader};
pub use slot::OnceSlot;
