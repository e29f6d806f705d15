//! Allocation holder for Ballast memory-pressure simulation.
//!
//! A [`Holder`] owns at most one [`Block`]: a raw allocation whose pages
//! have each been written once so the operating system commits physical
//! memory instead of a lazy mapping. Requesting a new block releases the
//! old one first. This crate is one of two that may contain `unsafe` code
//! (along with `ballast-ffi`), and all of it lives in `raw.rs`.
//!
//! # Architecture
//!
//! ```text
//! SharedHolder (Mutex, usable from any thread, const-constructible)
//! └── Holder (EMPTY / HOLDING state machine + stats)
//!     └── Block (owned pointer + layout, frees on drop)
//!         └── raw (alloc / touch / read / dealloc primitives)
//! ```
//!
//! # State machine
//!
//! ```text
//! EMPTY   --allocate(ok)-->   HOLDING
//! EMPTY   --allocate(err)-->  EMPTY
//! HOLDING --allocate-->       release old, then EMPTY or HOLDING
//! HOLDING --release-->        EMPTY
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod holder;
mod raw;
pub mod shared;

pub use block::Block;
pub use holder::{Holder, HolderState, HolderStats};
pub use shared::SharedHolder;
