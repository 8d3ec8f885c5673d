//! Integration test: backend probing and required-backend checks
//!
//! Probing real libraries succeeds or fails depending on the host, so these
//! tests check the report's shape and build reports by hand for the
//! required-backend logic.
//!
//! Run with: cargo test -p gpuprof-core --test probe_test -- --nocapture

use gpuprof_core::{probe, BackendStatus, CoreError, ProbeReport};
use gpuprof_dispatch::DispatchError;
use gpuprof_driver::Backend;

fn available(backend: Backend) -> BackendStatus {
    BackendStatus::from_version(backend, true, Ok(Some(12040)))
}

fn unavailable(backend: Backend) -> BackendStatus {
    BackendStatus::from_version(
        backend,
        false,
        Err(DispatchError::LibraryNotFound {
            library: backend.library_name(),
            search_path: "LD_LIBRARY_PATH",
        }),
    )
}

#[test]
fn test_probe_reports_each_backend_once() {
    let report = probe(&[Backend::Roctracer, Backend::Cupti, Backend::Roctracer]);
    let order: Vec<Backend> = report.backends.iter().map(|s| s.backend).collect();
    assert_eq!(order, vec![Backend::Roctracer, Backend::Cupti]);

    for status in &report.backends {
        println!("{:?}", status);
        assert_eq!(status.library, status.backend.library_name());
        if !status.loaded {
            assert!(status.error.is_some());
            assert_eq!(status.version, None);
        }
    }
}

#[test]
fn test_probe_nothing() {
    let report = probe(&[]);
    assert!(report.backends.is_empty());
    assert!(report.missing_required(&[]).is_empty());
}

#[test]
fn test_status_keeps_loaded_flag_when_query_fails() {
    let status = BackendStatus::from_version(
        Backend::Cuda,
        true,
        Err(DispatchError::Execution { symbol: "cuDriverGetVersion", code: 3 }),
    );
    assert!(status.loaded);
    assert_eq!(status.version, None);
    assert_eq!(
        status.error.as_deref(),
        Some("failed to execute cuDriverGetVersion with error 3")
    );
}

#[test]
fn test_missing_required() {
    let report = ProbeReport::new(vec![available(Backend::Cuda), unavailable(Backend::Cupti)]);

    assert!(report.missing_required(&[Backend::Cuda]).is_empty());
    assert_eq!(report.missing_required(&[Backend::Cupti]), vec![Backend::Cupti]);
    // never probed counts as missing
    assert_eq!(
        report.missing_required(&[Backend::Roctracer, Backend::Cuda]),
        vec![Backend::Roctracer]
    );
}

#[test]
fn test_check_required_error_lists_backends() {
    let report = ProbeReport::new(vec![unavailable(Backend::Cupti), unavailable(Backend::Roctracer)]);

    assert!(report.check_required(&[]).is_ok());
    let err = report
        .check_required(&Backend::ALL)
        .expect_err("nothing is available");
    assert!(matches!(&err, CoreError::MissingBackends(b) if b.len() == 3));
    assert_eq!(
        err.to_string(),
        "required backend(s) not available: cupti, cuda, roctracer"
    );
}

#[test]
fn test_report_serializes_to_json() {
    let report = ProbeReport::new(vec![available(Backend::Cuda), unavailable(Backend::Roctracer)]);
    let json = serde_json::to_value(&report).expect("serialize report");
    println!("{}", json);

    assert_eq!(json["backends"][0]["backend"], "cuda");
    assert_eq!(json["backends"][0]["loaded"], true);
    assert_eq!(json["backends"][0]["version"], 12040);
    assert_eq!(json["backends"][1]["backend"], "roctracer");
    assert_eq!(json["backends"][1]["library"], "libroctracer64.so");
    assert!(json["backends"][1]["error"]
        .as_str()
        .is_some_and(|e| e.contains("libroctracer64.so")));
    assert!(json["search_path_var"].is_string());
}
