//! NoteHub database layer

pub mod db;

pub use db::*;
