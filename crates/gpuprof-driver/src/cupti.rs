//! CUPTI (CUDA Profiling Tools Interface), loaded on first use.
//!
//! Loaded from `libcupti.so` (Linux) or `cupti64_2024.1.0.dll` (Windows),
//! falling back to the directory given by `CUPTI_LIB_DIR` at build time.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_uint, c_void};

use gpuprof_dispatch::{define_dispatch, DispatchError, DynamicLoader, ExternLib, OnceSlot};
use libloading::Library;

/// CUPTI result type (CUptiResult).
pub type CUptiResult = c_uint;

pub type CUpti_CallbackDomain = c_uint;
pub type CUpti_CallbackId = u32;
pub type CUpti_ActivityKind = c_uint;
pub type CUpti_ActivityAttribute = c_uint;
pub type CUpti_ExternalCorrelationKind = c_uint;

/// Opaque CUDA/CUPTI handles.
pub type CUcontext = *mut c_void;
pub type CUgraph = *mut c_void;
pub type CUgraphExec = *mut c_void;
pub type CUpti_SubscriberHandle = *mut c_void;

pub type CUpti_CallbackFunc = Option<
    unsafe extern "C" fn(
        userdata: *mut c_void,
        domain: CUpti_CallbackDomain,
        cbid: CUpti_CallbackId,
        cbdata: *const c_void,
    ),
>;
pub type CUpti_BuffersCallbackRequestFunc = Option<
    unsafe extern "C" fn(buffer: *mut *mut u8, size: *mut usize, max_num_records: *mut usize),
>;
pub type CUpti_BuffersCallbackCompleteFunc = Option<
    unsafe extern "C" fn(
        context: CUcontext,
        stream_id: u32,
        buffer: *mut u8,
        size: usize,
        valid_size: usize,
    ),
>;

pub const CUPTI_SUCCESS: CUptiResult = 0;
pub const CUPTI_ERROR_MAX_LIMIT_REACHED: CUptiResult = 12;
pub const CUPTI_ERROR_NOT_INITIALIZED: CUptiResult = 15;
pub const CUPTI_ERROR_UNKNOWN: CUptiResult = 999;

pub const CUPTI_CB_DOMAIN_DRIVER_API: CUpti_CallbackDomain = 1;
pub const CUPTI_CB_DOMAIN_RUNTIME_API: CUpti_CallbackDomain = 2;
pub const CUPTI_CB_DOMAIN_RESOURCE: CUpti_CallbackDomain = 3;
pub const CUPTI_CB_DOMAIN_SYNCHRONIZE: CUpti_CallbackDomain = 4;
pub const CUPTI_CB_DOMAIN_NVTX: CUpti_CallbackDomain = 5;

pub const CUPTI_ACTIVITY_KIND_KERNEL: CUpti_ActivityKind = 3;
pub const CUPTI_ACTIVITY_KIND_DRIVER: CUpti_ActivityKind = 4;
pub const CUPTI_ACTIVITY_KIND_RUNTIME: CUpti_ActivityKind = 5;
pub const CUPTI_ACTIVITY_KIND_CONCURRENT_KERNEL: CUpti_ActivityKind = 10;
pub const CUPTI_ACTIVITY_KIND_EXTERNAL_CORRELATION: CUpti_ActivityKind = 39;

pub const CUPTI_ACTIVITY_ATTR_DEVICE_BUFFER_SIZE: CUpti_ActivityAttribute = 0;
pub const CUPTI_ACTIVITY_ATTR_DEVICE_BUFFER_SIZE_CDP: CUpti_ActivityAttribute = 1;
pub const CUPTI_ACTIVITY_ATTR_DEVICE_BUFFER_POOL_LIMIT: CUpti_ActivityAttribute = 2;

pub const CUPTI_EXTERNAL_CORRELATION_KIND_CUSTOM0: CUpti_ExternalCorrelationKind = 3;
pub const CUPTI_EXTERNAL_CORRELATION_KIND_CUSTOM1: CUpti_ExternalCorrelationKind = 4;

/// Flag for `activity_flush_all`: flush records of still-running activities too.
pub const CUPTI_ACTIVITY_FLAG_FLUSH_FORCED: u32 = 1;

/// Common header of every activity record.
#[repr(C)]
pub struct CUpti_Activity {
    pub kind: CUpti_ActivityKind,
}

#[repr(C)]
pub struct CUpti_GetCubinCrcParams {
    pub size: usize,
    pub cubin_size: usize,
    pub cubin: *const c_void,
    pub cubin_crc: u64,
}

#[repr(C)]
pub struct CUpti_GetSassToSourceCorrelationParams {
    pub size: usize,
    pub cubin: *const c_void,
    pub function_name: *const c_char,
    pub cubin_size: usize,
    pub line_number: u32,
    pub pc_offset: u64,
    pub file_name: *mut c_char,
    pub dir_name: *mut c_char,
}

macro_rules! opaque_params {
    ($($name:ident),+ $(,)?) => {
        $(
            /// PC sampling parameter block; layout is owned by `cupti_pcsampling.h`.
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )+
    };
}

opaque_params!(
    CUpti_PCSamplingGetNumStallReasonsParams,
    CUpti_PCSamplingGetStallReasonsParams,
    CUpti_PCSamplingConfigurationInfoParams,
    CUpti_PCSamplingEnableParams,
    CUpti_PCSamplingDisableParams,
    CUpti_PCSamplingGetDataParams,
    CUpti_PCSamplingStartParams,
    CUpti_PCSamplingStopParams,
);

/// Descriptor for the CUPTI shared library.
pub enum ExternLibCupti {}

impl ExternLib for ExternLibCupti {
    type RetType = CUptiResult;
    type Loader = DynamicLoader;
    #[cfg(not(windows))]
    const NAME: &'static str = "libcupti.so";
    #[cfg(windows)]
    const NAME: &'static str = "cupti64_2024.1.0.dll";
    const DEFAULT_DIR: Option<&'static str> = option_env!("CUPTI_LIB_DIR");
    const SUCCESS: CUptiResult = CUPTI_SUCCESS;

    fn module_slot() -> &'static OnceSlot<Library> {
        static LIB: OnceSlot<Library> = OnceSlot::new();
        &LIB
    }
}

define_dispatch! {
    ExternLibCupti;

    /// Returns the CUPTI API version.
    pub fn get_version(version: *mut u32) => cuptiGetVersion;
    pub fn get_context_id(context: CUcontext, context_id: *mut u32) => cuptiGetContextId;

    // ── Callbacks ───────────────────────────────────────────────────

    pub fn subscribe(
        subscriber: *mut CUpti_SubscriberHandle,
        callback: CUpti_CallbackFunc,
        userdata: *mut c_void,
    ) => cuptiSubscribe;
    pub fn unsubscribe(subscriber: CUpti_SubscriberHandle) => cuptiUnsubscribe;
    pub fn enable_domain(
        enable: u32,
        subscriber: CUpti_SubscriberHandle,
        domain: CUpti_CallbackDomain,
    ) => cuptiEnableDomain;
    pub fn enable_callback(
        enable: u32,
        subscriber: CUpti_SubscriberHandle,
        domain: CUpti_CallbackDomain,
        cbid: CUpti_CallbackId,
    ) => cuptiEnableCallback;

    // ── Activity API ────────────────────────────────────────────────

    /// Installs the buffer request/complete callbacks for activity records.
    pub fn activity_register_callbacks(
        request: CUpti_BuffersCallbackRequestFunc,
        complete: CUpti_BuffersCallbackCompleteFunc,
    ) => cuptiActivityRegisterCallbacks;
    pub fn activity_enable(kind: CUpti_ActivityKind) => cuptiActivityEnable;
    pub fn activity_disable(kind: CUpti_ActivityKind) => cuptiActivityDisable;
    pub fn activity_enable_context(context: CUcontext, kind: CUpti_ActivityKind) => cuptiActivityEnableContext;
    pub fn activity_disable_context(context: CUcontext, kind: CUpti_ActivityKind) => cuptiActivityDisableContext;
    pub fn activity_flush_all(flag: u32) => cuptiActivityFlushAll;
    /// Advances `record` through a completed buffer. Returns
    /// `CUPTI_ERROR_MAX_LIMIT_REACHED` at the end, so callers normally use the
    /// unchecked form.
    pub fn activity_get_next_record(
        buffer: *mut u8,
        valid_buffer_size: usize,
        record: *mut *mut CUpti_Activity,
    ) => cuptiActivityGetNextRecord;
    pub fn activity_push_external_correlation_id(
        kind: CUpti_ExternalCorrelationKind,
        id: u64,
    ) => cuptiActivityPushExternalCorrelationId;
    pub fn activity_pop_external_correlation_id(
        kind: CUpti_ExternalCorrelationKind,
        last_id: *mut u64,
    ) => cuptiActivityPopExternalCorrelationId;
    pub fn activity_set_attribute(
        attr: CUpti_ActivityAttribute,
        value_size: *mut usize,
        value: *mut c_void,
    ) => cuptiActivitySetAttribute;

    /// Detaches CUPTI from the process.
    pub fn finalize() => cuptiFinalize;

    // ── Graphs and binaries ─────────────────────────────────────────

    pub fn get_graph_exec_id(graph_exec: CUgraphExec, id: *mut u32) => cuptiGetGraphExecId;
    pub fn get_graph_id(graph: CUgraph, id: *mut u32) => cuptiGetGraphId;
    pub fn get_cubin_crc(params: *mut CUpti_GetCubinCrcParams) => cuptiGetCubinCrc;
    pub fn get_sass_to_source_correlation(
        params: *mut CUpti_GetSassToSourceCorrelationParams,
    ) => cuptiGetSassToSourceCorrelation;

    // ── PC sampling ─────────────────────────────────────────────────

    pub fn pc_sampling_get_num_stall_reasons(
        params: *mut CUpti_PCSamplingGetNumStallReasonsParams,
    ) => cuptiPCSamplingGetNumStallReasons;
    pub fn pc_sampling_get_stall_reasons(
        params: *mut CUpti_PCSamplingGetStallReasonsParams,
    ) => cuptiPCSamplingGetStallReasons;
    pub fn pc_sampling_set_configuration_attribute(
        params: *mut CUpti_PCSamplingConfigurationInfoParams,
    ) => cuptiPCSamplingSetConfigurationAttribute;
    pub fn pc_sampling_enable(params: *mut CUpti_PCSamplingEnableParams) => cuptiPCSamplingEnable;
    pub fn pc_sampling_disable(params: *mut CUpti_PCSamplingDisableParams) => cuptiPCSamplingDisable;
    pub fn pc_sampling_get_data(params: *mut CUpti_PCSamplingGetDataParams) => cuptiPCSamplingGetData;
    pub fn pc_sampling_start(params: *mut CUpti_PCSamplingStartParams) => cuptiPCSamplingStart;
    pub fn pc_sampling_stop(params: *mut CUpti_PCSamplingStopParams) => cuptiPCSamplingStop;
}

/// Symbolic name of a CUPTI result code.
pub fn error_name(code: CUptiResult) -> &'static str {
    match code {
        0 => "CUPTI_SUCCESS",
        1 => "CUPTI_ERROR_INVALID_PARAMETER",
        2 => "CUPTI_ERROR_INVALID_DEVICE",
        3 => "CUPTI_ERROR_INVALID_CONTEXT",
        4 => "CUPTI_ERROR_INVALID_EVENT_DOMAIN_ID",
        5 => "CUPTI_ERROR_INVALID_EVENT_ID",
        6 => "CUPTI_ERROR_INVALID_EVENT_NAME",
        7 => "CUPTI_ERROR_INVALID_OPERATION",
        8 => "CUPTI_ERROR_OUT_OF_MEMORY",
        9 => "CUPTI_ERROR_HARDWARE",
        10 => "CUPTI_ERROR_PARAMETER_SIZE_NOT_SUFFICIENT",
        11 => "CUPTI_ERROR_API_NOT_IMPLEMENTED",
        12 => "CUPTI_ERROR_MAX_LIMIT_REACHED",
        13 => "CUPTI_ERROR_NOT_READY",
        14 => "CUPTI_ERROR_NOT_COMPATIBLE",
        15 => "CUPTI_ERROR_NOT_INITIALIZED",
        16 => "CUPTI_ERROR_INVALID_METRIC_ID",
        17 => "CUPTI_ERROR_INVALID_METRIC_NAME",
        18 => "CUPTI_ERROR_QUEUE_EMPTY",
        19 => "CUPTI_ERROR_INVALID_HANDLE",
        20 => "CUPTI_ERROR_INVALID_STREAM",
        21 => "CUPTI_ERROR_INVALID_KIND",
        22 => "CUPTI_ERROR_INVALID_EVENT_VALUE",
        23 => "CUPTI_ERROR_DISABLED",
        24 => "CUPTI_ERROR_INVALID_MODULE",
        25 => "CUPTI_ERROR_INVALID_METRIC_VALUE",
        26 => "CUPTI_ERROR_HARDWARE_BUSY",
        27 => "CUPTI_ERROR_NOT_SUPPORTED",
        35 => "CUPTI_ERROR_INSUFFICIENT_PRIVILEGES",
        _ => "CUPTI_ERROR_UNKNOWN",
    }
}

/// CUPTI API version, or the load/execution error that prevented reading it.
pub fn version() -> Result<u32, DispatchError> {
    let mut version = 0u32;
    unsafe { get_version::<true>(&mut version) }?;
    Ok(version)
}
