//! Site content draft/publish workflow.
//!
//! The server side lives in [`store`] and [`events`]; the editing side in
//! [`client`], [`editor`] and [`preview`]. Both share the wire types in
//! [`content`].

pub mod client;
pub mod content;
pub mod editor;
pub mod events;
pub mod preview;
pub mod store;
