//! `ensdf-tools` builds radionuclide decay schemes from ENSDF data files
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use ensdf_utils as utils;

#[cfg(feature = "decay")]
#[cfg_attr(docsrs, doc(cfg(feature = "decay")))]
#[doc(inline)]
pub use ensdf_decay as decay;

#[cfg(feature = "relax")]
#[cfg_attr(docsrs, doc(cfg(feature = "relax")))]
#[doc(inline)]
pub use ensdf_relax as relax;

/// Set up logging to stderr for a given verbosity
///
/// Verbosity follows the same levels as the `verbosity` option used when
/// reading decay data:
///
/// | Verbosity | Output                                  |
/// | --------- | --------------------------------------- |
/// | 0         | warnings and errors only                |
/// | 1         | summaries of what was read              |
/// | 2         | details for every record                |
/// | 3+        | raw line blocks and everything else     |
///
/// Calling this more than once is harmless, later calls are ignored with a
/// warning.
pub fn init_logging(verbosity: usize) {
    let result = stderrlog::new()
        .module("ensdf_decay")
        .module("ensdf_relax")
        .verbosity(verbosity + 1)
        .show_level(true)
        .init();

    if result.is_err() {
        log::warn!("Logger already initialised, ignoring verbosity {verbosity}");
    }
}
