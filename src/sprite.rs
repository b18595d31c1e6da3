pub(crate) mod action;
pub(crate) mod animated;
pub(crate) mod model;
pub(crate) mod region;
pub(crate) mod stack;
