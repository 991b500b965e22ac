//! Yoroolbot - bot toolkit: keyed handler tables and outbound reply descriptors

pub(crate) mod api;

pub mod dispatch {
    pub use crate::api::dispatch::{DispatchTable, DispatchTableBuilder, DuplicateKey, Keyed};
}

pub mod reply {
    pub use crate::api::reply::{Button, ButtonGrid, Reply, send_replies};
}
