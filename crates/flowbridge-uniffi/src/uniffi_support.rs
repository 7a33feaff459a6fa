// Custom type definitions from the core crate (e.g. `flowbridge_core::CallbackHandle`) are
// usable here without forwarding: since uniffi 0.28 `custom_newtype!` implements the FFI
// traits for every crate's `UniFfiTag`, so `ffi_converter_forward!` no longer exists.
