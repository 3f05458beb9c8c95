pub(crate) mod catalog;
pub(crate) mod registry;
pub(crate) mod resolve;
pub(crate) mod source;
pub(crate) mod state;
