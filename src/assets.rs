pub(crate) mod bundle;
pub(crate) mod decode;
pub(crate) mod store;
