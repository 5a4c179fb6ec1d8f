pub mod debounce;
pub mod deepl;
pub mod fingerprint;
pub mod normalize;
pub mod store;
