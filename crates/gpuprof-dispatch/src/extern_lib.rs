use std::fmt::Debug;

use crate::loader::ModuleLoader;
use crate::slot::OnceSlot;

/// Compile-time description of one optional vendor library.
///
/// Implementors are marker types that are never constructed. Each one owns a
/// distinct module slot; two descriptors never share a loaded handle.
///
/// ```ignore
/// pub enum ExternLibCupti {}
///
/// impl ExternLib for ExternLibCupti {
///     type RetType = CUptiResult;
///     type Loader = DynamicLoader;
///     const NAME: &'static str = "libcupti.so";
///     const DEFAULT_DIR: Option<&'static str> = option_env!("CUPTI_LIB_DIR");
///     const SUCCESS: CUptiResult = CUPTI_SUCCESS;
///
///     fn module_slot() -> &'static OnceSlot<Library> {
///         static LIB: OnceSlot<Library> = OnceSlot::new();
///         &LIB
///     }
/// }
/// ```
pub trait ExternLib: 'static {
    /// The status type every entry point of the library returns.
    type RetType: Copy + PartialEq + Debug + Into<i64> + 'static;

    /// Platform primitives used to find and query the library.
    type Loader: ModuleLoader;

    /// Platform file name, used for loading and in error messages.
    const NAME: &'static str;

    /// Directory to retry from when the standard search fails.
    /// `None` or an empty string skips that step.
    const DEFAULT_DIR: Option<&'static str>;

    /// Return code meaning the call succeeded.
    const SUCCESS: Self::RetType;

    /// Process-wide slot holding the loaded module.
    fn module_slot() -> &'static OnceSlot<ModuleOf<Self>>;
}

/// Module handle type of a descriptor's loader.
pub type ModuleOf<L> = <<L as ExternLib>::Loader as ModuleLoader>::Module;
