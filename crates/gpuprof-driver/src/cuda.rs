//! The CUDA driver API entry points a profiler host needs, loaded on first use.
//!
//! Uses `libcuda.so.1` (Linux) or `nvcuda.dll` (Windows). The driver is
//! normally resident already in any process that runs CUDA work, so the
//! first load step usually succeeds without opening anything.

use std::ffi::{c_int, c_uint, c_void};

use gpuprof_dispatch::{define_dispatch, DispatchError, DynamicLoader, ExternLib, OnceSlot};
use libloading::Library;

/// CUDA result type (CUresult).
pub type CUresult = c_int;

/// CUDA device type.
pub type CUdevice = c_int;

/// Opaque CUDA types (represented as pointers).
pub type CUcontext = *mut c_void;
pub type CUstream = *mut c_void;
pub type CUdeviceptr = u64;

pub const CUDA_SUCCESS: CUresult = 0;
pub const CUDA_ERROR_NOT_INITIALIZED: CUresult = 3;
pub const CUDA_ERROR_NOT_READY: CUresult = 600;

pub const CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT: c_int = 16;
pub const CU_DEVICE_ATTRIBUTE_CLOCK_RATE: c_int = 13;
pub const CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR: c_int = 75;
pub const CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR: c_int = 76;

pub const CU_STREAM_NON_BLOCKING: c_uint = 1;

/// Descriptor for the CUDA driver library.
pub enum ExternLibCuda {}

impl ExternLib for ExternLibCuda {
    type RetType = CUresult;
    type Loader = DynamicLoader;
    #[cfg(not(windows))]
    const NAME: &'static str = "libcuda.so.1";
    #[cfg(windows)]
    const NAME: &'static str = "nvcuda.dll";
    const DEFAULT_DIR: Option<&'static str> = option_env!("CUDA_LIB_DIR");
    const SUCCESS: CUresult = CUDA_SUCCESS;

    fn module_slot() -> &'static OnceSlot<Library> {
        static LIB: OnceSlot<Library> = OnceSlot::new();
        &LIB
    }
}

define_dispatch! {
    ExternLibCuda;

    pub fn init(flags: c_uint) => cuInit;
    pub fn driver_get_version(version: *mut c_int) => cuDriverGetVersion;

    // ── Devices ─────────────────────────────────────────────────────

    pub fn device_get(device: *mut CUdevice, ordinal: c_int) => cuDeviceGet;
    pub fn device_get_attribute(pi: *mut c_int, attrib: c_int, device: CUdevice) => cuDeviceGetAttribute;

    // ── Contexts ────────────────────────────────────────────────────

    pub fn ctx_get_current(pctx: *mut CUcontext) => cuCtxGetCurrent;
    pub fn ctx_get_device(device: *mut CUdevice) => cuCtxGetDevice;
    pub fn ctx_synchronize() => cuCtxSynchronize;
    pub fn ctx_get_stream_priority_range(least: *mut c_int, greatest: *mut c_int) => cuCtxGetStreamPriorityRange;

    // ── Streams and memory ──────────────────────────────────────────

    pub fn stream_create_with_priority(
        stream: *mut CUstream,
        flags: c_uint,
        priority: c_int,
    ) => cuStreamCreateWithPriority;
    pub fn stream_synchronize(stream: CUstream) => cuStreamSynchronize;
    pub fn mem_alloc_host(pp: *mut *mut c_void, bytesize: usize) => cuMemAllocHost_v2;
    pub fn mem_free_host(p: *mut c_void) => cuMemFreeHost;
    /// Asynchronous device-to-host copy on `stream`.
    pub fn memcpy_dtoh_async(
        dst: *mut c_void,
        src: CUdeviceptr,
        byte_count: usize,
        stream: CUstream,
    ) => cuMemcpyDtoHAsync_v2;
}

/// Installed driver version, e.g. `12040` for CUDA 12.4.
pub fn driver_version() -> Result<i32, DispatchError> {
    let mut version: c_int = 0;
    unsafe { driver_get_version::<true>(&mut version) }?;
    Ok(version)
}

/// Symbolic name of the CUDA result codes a profiler commonly sees.
pub fn error_name(code: CUresult) -> &'static str {
    match code {
        0 => "CUDA_SUCCESS",
        1 => "CUDA_ERROR_INVALID_VALUE",
        2 => "CUDA_ERROR_OUT_OF_MEMORY",
        3 => "CUDA_ERROR_NOT_INITIALIZED",
        4 => "CUDA_ERROR_DEINITIALIZED",
        5 => "CUDA_ERROR_PROFILER_DISABLED",
        34 => "CUDA_ERROR_STUB_LIBRARY",
        100 => "CUDA_ERROR_NO_DEVICE",
        101 => "CUDA_ERROR_INVALID_DEVICE",
        201 => "CUDA_ERROR_INVALID_CONTEXT",
        400 => "CUDA_ERROR_INVALID_HANDLE",
        500 => "CUDA_ERROR_NOT_FOUND",
        600 => "CUDA_ERROR_NOT_READY",
        700 => "CUDA_ERROR_ILLEGAL_ADDRESS",
        719 => "CUDA_ERROR_LAUNCH_FAILED",
        800 => "CUDA_ERROR_NOT_PERMITTED",
        801 => "CUDA_ERROR_NOT_SUPPORTED",
        _ => "CUDA_ERROR_UNKNOWN",
    }
}
