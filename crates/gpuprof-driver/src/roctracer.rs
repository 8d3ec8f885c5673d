//! roctracer (ROCm API and activity tracing), loaded on first use.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_void};

use gpuprof_dispatch::{define_dispatch, DynamicLoader, ExternLib, OnceSlot};
use libloading::Library;

/// roctracer result type (roctracer_status_t).
pub type roctracer_status_t = c_int;
pub type activity_domain_t = u32;
pub type activity_correlation_id_t = u64;
pub type roctracer_timestamp_t = u64;

pub const ROCTRACER_STATUS_SUCCESS: roctracer_status_t = 0;
pub const ROCTRACER_STATUS_ERROR: roctracer_status_t = -1;
pub const ROCTRACER_STATUS_ERROR_INVALID_DOMAIN_ID: roctracer_status_t = -2;
pub const ROCTRACER_STATUS_ERROR_INVALID_ARGUMENT: roctracer_status_t = -3;

pub const ACTIVITY_DOMAIN_HSA_API: activity_domain_t = 0;
pub const ACTIVITY_DOMAIN_HSA_OPS: activity_domain_t = 1;
pub const ACTIVITY_DOMAIN_HIP_OPS: activity_domain_t = 2;
pub const ACTIVITY_DOMAIN_HIP_API: activity_domain_t = 3;
pub const ACTIVITY_DOMAIN_KFD_API: activity_domain_t = 4;
pub const ACTIVITY_DOMAIN_EXT_API: activity_domain_t = 5;
pub const ACTIVITY_DOMAIN_ROCTX: activity_domain_t = 6;

pub type activity_rtapi_callback_t = Option<
    unsafe extern "C" fn(domain: u32, cid: u32, callback_data: *const c_void, arg: *mut c_void),
>;
pub type roctracer_allocator_t =
    Option<unsafe extern "C" fn(ptr: *mut *mut c_char, size: usize, arg: *mut c_void)>;
pub type roctracer_buffer_callback_t =
    Option<unsafe extern "C" fn(begin: *const c_char, end: *const c_char, arg: *mut c_void)>;

/// Activity pool configuration.
#[repr(C)]
pub struct roctracer_properties_t {
    pub mode: u32,
    pub buffer_size: usize,
    pub alloc_fun: roctracer_allocator_t,
    pub alloc_arg: *mut c_void,
    pub buffer_callback_fun: roctracer_buffer_callback_t,
    pub buffer_callback_arg: *mut c_void,
}

/// Opaque activity pool handle.
#[repr(C)]
pub struct roctracer_pool_t {
    _private: [u8; 0],
}

/// Activity record; walk a buffer with [`next_record`].
#[repr(C)]
pub struct activity_record_t {
    _private: [u8; 0],
}

/// Descriptor for the roctracer shared library.
pub enum ExternLibRoctracer {}

impl ExternLib for ExternLibRoctracer {
    type RetType = roctracer_status_t;
    type Loader = DynamicLoader;
    const NAME: &'static str = "libroctracer64.so";
    const DEFAULT_DIR: Option<&'static str> = option_env!("ROCTRACER_LIB_DIR");
    const SUCCESS: roctracer_status_t = ROCTRACER_STATUS_SUCCESS;

    fn module_slot() -> &'static OnceSlot<Library> {
        static LIB: OnceSlot<Library> = OnceSlot::new();
        &LIB
    }
}

define_dispatch! {
    ExternLibRoctracer;

    pub fn set_properties(domain: activity_domain_t, properties: *mut c_void) => roctracer_set_properties;
    pub fn get_timestamp(timestamp: *mut roctracer_timestamp_t) => roctracer_get_timestamp;

    pub fn enable_domain_callback(
        domain: activity_domain_t,
        callback: activity_rtapi_callback_t,
        arg: *mut c_void,
    ) => roctracer_enable_domain_callback;
    pub fn disable_domain_callback(domain: activity_domain_t) => roctracer_disable_domain_callback;

    /// Enables activity records for `domain`; a null `pool` means the default pool.
    pub fn enable_domain_activity(
        domain: activity_domain_t,
        pool: *mut roctracer_pool_t,
    ) => roctracer_enable_domain_activity_expl;
    pub fn disable_domain_activity(domain: activity_domain_t) => roctracer_disable_domain_activity;

    /// Creates an activity pool. With a null `pool` out-pointer it becomes the default pool.
    pub fn open_pool(
        properties: *const roctracer_properties_t,
        pool: *mut *mut roctracer_pool_t,
    ) => roctracer_open_pool_expl;
    pub fn close_pool(pool: *mut roctracer_pool_t) => roctracer_close_pool_expl;
    pub fn flush_activity(pool: *mut roctracer_pool_t) => roctracer_flush_activity_expl;
    pub fn next_record(
        record: *const activity_record_t,
        next: *mut *const activity_record_t,
    ) => roctracer_next_record;

    pub fn activity_push_external_correlation_id(
        id: activity_correlation_id_t,
    ) => roctracer_activity_push_external_correlation_id;
    pub fn activity_pop_external_correlation_id(
        last_id: *mut activity_correlation_id_t,
    ) => roctracer_activity_pop_external_correlation_id;
}
