//! Platform primitives for finding, loading and querying shared libraries.

use std::ffi::c_void;
use std::path::Path;
use std::ptr::NonNull;

use libloading::Library;

/// The three operations [`Dispatch`](crate::Dispatch) needs from the platform.
///
/// Implementations are stateless; the loaded module is owned by the
/// descriptor's slot, not by the loader.
pub trait ModuleLoader: 'static {
    /// Handle to a loaded module. Kept alive until process exit.
    type Module: Send + Sync + 'static;

    /// Returns the module if a library called `name` is already mapped into
    /// the process. Must not load anything new.
    fn resident(name: &str) -> Option<Self::Module>;

    /// Loads the library at `path`. A bare file name goes through the
    /// platform's standard search path.
    fn open(path: &Path) -> Result<Self::Module, String>;

    /// Looks up an exported symbol. Returns `None` when it is absent or null.
    fn symbol(module: &Self::Module, name: &str) -> Option<NonNull<c_void>>;
}

/// [`ModuleLoader`] backed by `dlopen`/`dlsym` or `LoadLibrary`/`GetProcAddress`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicLoader;

impl ModuleLoader for DynamicLoader {
    type Module = Library;

    #[cfg(unix)]
    fn resident(name: &str) -> Option<Library> {
        use libloading::os::unix;

        // RTLD_NOLOAD only hands back a handle when the library is mapped already.
        unsafe { unix::Library::open(Some(name), libc::RTLD_NOLOAD | libc::RTLD_LAZY) }
            .ok()
            .map(Library::from)
    }

    #[cfg(windows)]
    fn resident(name: &str) -> Option<Library> {
        use libloading::os::windows;

        #[allow(unused_unsafe)]
        unsafe { windows::Library::open_already_loaded(name) }
            .ok()
            .map(Library::from)
    }

    #[cfg(unix)]
    fn open(path: &Path) -> Result<Library, String> {
        use libloading::os::unix;

        unsafe { unix::Library::open(Some(path), unix::RTLD_LOCAL | unix::RTLD_LAZY) }
            .map(Library::from)
            .map_err(|e| e.to_string())
    }

    #[cfg(windows)]
    fn open(path: &Path) -> Result<Library, String> {
        unsafe { Library::new(path) }.map_err(|e| e.to_string())
    }

    fn symbol(module: &Library, name: &str) -> Option<NonNull<c_void>> {
        let sym = unsafe { module.get::<*mut c_void>(name.as_bytes()) }.ok()?;
        NonNull::new(*sym)
    }
}
