/// Returns the environment variable the platform's dynamic loader searches
/// for shared libraries. Shown to operators when a library cannot be found.
pub fn library_search_path_var() -> &'static str {
    #[cfg(target_os = "windows")]
    { "PATH" }
    #[cfg(target_os = "macos")]
    { "DYLD_LIBRARY_PATH" }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    { "LD_LIBRARY_PATH" }
}

/// Target OS name as reported in probe output (`linux`, `windows`, `macos`, ...).
pub fn platform_name() -> &'static str {
    std::env::consts::OS
}
