/// Failure modes of a dispatched vendor call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// None of the load strategies found the library.
    #[error("could not find `{library}`. Make sure it is in your {search_path}")]
    LibraryNotFound {
        library: &'static str,
        search_path: &'static str,
    },

    /// The library is loaded but does not export the requested symbol.
    #[error("failed to load {library}: symbol `{symbol}` not found")]
    SymbolNotFound {
        library: &'static str,
        symbol: &'static str,
    },

    /// A checked call returned something other than the library's success code.
    #[error("failed to execute {symbol} with error {code}")]
    Execution { symbol: &'static str, code: i64 },
}

impl DispatchError {
    /// True for errors raised before the vendor function ran: the library or
    /// the symbol could not be found.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DispatchError::LibraryNotFound { .. } | DispatchError::SymbolNotFound { .. }
        )
    }

    /// The vendor return code, for execution errors.
    pub fn code(&self) -> Option<i64> {
        match self {
            DispatchError::Execution { code, .. } => Some(*code),
            _ => None,
        }
    }
}
