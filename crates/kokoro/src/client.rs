pub(crate) mod base;
pub(crate) mod session;
pub(crate) mod simple;
