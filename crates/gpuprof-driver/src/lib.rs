//! Vendor profiling libraries, loaded on first use.
//!
//! Each module declares one [`ExternLib`](gpuprof_dispatch::ExternLib)
//! descriptor and its entry points. Every entry point is an `unsafe fn`
//! generic over `CHECK_SUCCESS`:
//!
//! ```ignore
//! let mut version = 0u32;
//! unsafe { cupti::get_version::<true>(&mut version) }?;
//! ```
//!
//! Default search directories are baked in at build time from
//! `CUPTI_LIB_DIR`, `CUDA_LIB_DIR` and `ROCTRACER_LIB_DIR`.

pub mod backend;
pub mod cuda;
pub mod cupti;
pub mod roctracer;

pub use backend::Backend;
