//! Loading, symbol resolution and the checked/unchecked call path.

use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem;
use std::path::Path;
use std::ptr::NonNull;

use tracing::{debug, info, trace};

use gpuprof_common::platform::library_search_path_var;

use crate::error::DispatchError;
use crate::extern_lib::{ExternLib, ModuleOf};
use crate::loader::ModuleLoader;
use crate::slot::OnceSlot;

/// Dispatcher for the vendor library described by `L`.
///
/// Never constructed; all state lives in `L::module_slot()` and in the
/// per-symbol slots owned by the generated wrappers.
pub struct Dispatch<L: ExternLib>(PhantomData<fn() -> L>);

impl<L: ExternLib> Dispatch<L> {
    /// Loads the library unless it is loaded already.
    ///
    /// Tries, in order: a copy already resident in the process, the platform's
    /// standard search path, then `L::DEFAULT_DIR` if one is configured.
    /// Failure is not cached; the next call starts over.
    pub fn ensure_loaded() -> Result<&'static ModuleOf<L>, DispatchError> {
        L::module_slot().get_or_try_init(|| {
            Self::locate().ok_or(DispatchError::LibraryNotFound {
                library: L::NAME,
                search_path: library_search_path_var(),
            })
        })
    }

    /// Whether a previous call loaded the library. Never attempts a load.
    pub fn is_loaded() -> bool {
        L::module_slot().is_set()
    }

    /// The loaded module, if any, without attempting a load.
    pub fn module() -> Option<&'static ModuleOf<L>> {
        L::module_slot().get()
    }

    /// Compares `ret` against the library's success code.
    pub fn check(ret: L::RetType, symbol: &'static str) -> Result<(), DispatchError> {
        if ret != L::SUCCESS {
            return Err(DispatchError::Execution {
                symbol,
                code: ret.into(),
            });
        }
        Ok(())
    }

    /// Returns the function pointer cached in `slot`, resolving `symbol` on
    /// first use. Loads the library first if needed.
    ///
    /// # Safety
    /// `F` must be an `extern "C"` function pointer type whose signature
    /// matches what the library exports under `symbol`.
    pub unsafe fn resolve<F: Copy>(
        slot: &OnceSlot<F>,
        symbol: &'static str,
    ) -> Result<F, DispatchError> {
        let module = Self::ensure_loaded()?;
        slot.get_or_try_init(|| {
            let addr = L::Loader::symbol(module, symbol).ok_or(DispatchError::SymbolNotFound {
                library: L::NAME,
                symbol,
            })?;
            trace!("resolved {}!{} at {:p}", L::NAME, symbol, addr);
            Ok(unsafe { fn_from_addr::<F>(addr) })
        })
        .copied()
    }

    /// Resolves `symbol`, hands the function pointer to `call` and returns
    /// the vendor's return code.
    ///
    /// With `CHECK_SUCCESS`, a code other than `L::SUCCESS` becomes
    /// [`DispatchError::Execution`]. Without it the raw code is returned
    /// unconditionally.
    ///
    /// # Safety
    /// Same contract as [`Dispatch::resolve`]. `call` must uphold whatever
    /// the vendor function requires of its arguments.
    pub unsafe fn exec<const CHECK_SUCCESS: bool, F: Copy>(
        slot: &OnceSlot<F>,
        symbol: &'static str,
        call: impl FnOnce(F) -> L::RetType,
    ) -> Result<L::RetType, DispatchError> {
        let func = unsafe { Self::resolve(slot, symbol)? };
        let ret = call(func);
        if CHECK_SUCCESS {
            Self::check(ret, symbol)?;
        }
        Ok(ret)
    }

    fn locate() -> Option<ModuleOf<L>> {
        if let Some(module) = L::Loader::resident(L::NAME) {
            debug!("reusing resident {}", L::NAME);
            return Some(module);
        }

        match L::Loader::open(Path::new(L::NAME)) {
            Ok(module) => {
                info!("loaded {} from the library search path", L::NAME);
                return Some(module);
            }
            Err(e) => debug!("failed to load {}: {}", L::NAME, e),
        }

        let dir = L::DEFAULT_DIR.filter(|dir| !dir.is_empty())?;
        let path = Path::new(dir).join(L::NAME);
        match L::Loader::open(&path) {
            Ok(module) => {
                info!("loaded {} from: {}", L::NAME, path.display());
                Some(module)
            }
            Err(e) => {
                debug!("failed to load {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Reinterprets a symbol address as the function pointer type `F`.
/// A pointer-sized `F` is enforced when the wrapper is monomorphised.
unsafe fn fn_from_addr<F: Copy>(addr: NonNull<c_void>) -> F {
    const {
        assert!(
            mem::size_of::<F>() == mem::size_of::<*mut c_void>(),
            "symbol slots must hold plain function pointers"
        )
    };
    unsafe { mem::transmute_copy::<*mut c_void, F>(&addr.as_ptr()) }
}
