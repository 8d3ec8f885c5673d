/// Declares typed wrappers for vendor entry points of one [`ExternLib`](crate::ExternLib).
///
/// Each `fn` line produces one `unsafe fn` generic over
/// `const CHECK_SUCCESS: bool`. `name::<true>(..)` turns a non-success
/// return code into [`DispatchError::Execution`](crate::DispatchError::Execution);
/// `name::<false>(..)` hands back the raw code. Both instantiations share one
/// symbol slot, so the symbol is resolved once by whichever runs first.
///
/// ```ignore
/// define_dispatch! {
///     ExternLibCupti;
///
///     /// Returns the CUPTI API version.
///     pub fn get_version(version: *mut u32) => cuptiGetVersion;
///     pub fn finalize() => cuptiFinalize;
/// }
/// ```
#[macro_export]
macro_rules! define_dispatch {
    (
        $lib:ty;
        $(
            $(#[$meta:meta])*
            $vis:vis fn $name:ident ( $($arg:ident : $ty:ty),* $(,)? ) => $symbol:ident;
        )*
    ) => {
        $(
            $(#[$meta])*
            #[doc = ""]
            #[doc = "# Safety"]
            #[doc = ""]
            #[doc = concat!("Forwards directly to `", stringify!($symbol), "`; the caller must uphold its contract.")]
            $vis unsafe fn $name<const CHECK_SUCCESS: bool>(
                $($arg: $ty),*
            ) -> ::core::result::Result<
                <$lib as $crate::ExternLib>::RetType,
                $crate::DispatchError,
            > {
                type Func = unsafe extern "C" fn($($ty),*) -> <$lib as $crate::ExternLib>::RetType;
                static SYMBOL: $crate::OnceSlot<Func> = $crate::OnceSlot::new();

                let call = |func: Func| unsafe { func($($arg),*) };
                unsafe {
                    $crate::Dispatch::<$lib>::exec::<CHECK_SUCCESS, Func>(
                        &SYMBOL,
                        stringify!($symbol),
                        call,
                    )
                }
            }
        )*
    };
}
