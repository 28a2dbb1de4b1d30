//! Version reported by `clibuild --version`.
//!
//! Rewritten in place by `clibuild update version src/version.rs [NEW VERSION]`.

pub const VERSION: &str = "v0.0.3";
