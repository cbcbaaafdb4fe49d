pub use tenconf_types::prelude::*;

// vim: ts=4
