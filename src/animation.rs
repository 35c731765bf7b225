pub(crate) mod driver;
pub(crate) mod spec;
pub(crate) mod warp;
pub(crate) mod zoom;
