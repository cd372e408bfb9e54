//! Playlist rendering and writing

pub mod generator;
pub mod writer;

pub use generator::{PlaylistGenerator, RenderedPlaylist, header_line};
pub use writer::{DEBUG_FILE_NAME, debug_path, write_atomic};
