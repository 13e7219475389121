//! Shared test utilities for the workspace.

/// Helper macro to create a field element from a small integer.
///
/// Expands to `sigil_core::base::Element::from(...)`; the using crate must
/// depend on `sigil-core`.
#[macro_export]
macro_rules! fe {
    ($v:expr) => {{
        let value: u64 = $v;
        ::sigil_core::base::Element::from(value)
    }};
}

/// Helper macro to create a vector of field elements from small integers.
#[macro_export]
macro_rules! fes {
    ($($v:expr),* $(,)?) => {
        vec![$( $crate::fe!($v) ),*]
    };
}
