//! Musicfox Core - data layer for a terminal music client
//!
//! This crate provides the pieces the client builds on: local data
//! directory resolution, storage key encoding, response code
//! classification and extraction of typed entities from API responses.

pub mod codec;
pub mod extract;
pub mod model;
pub mod paths;
pub mod response;
pub mod text;

pub use codec::{ bin_to_id, id_to_bin, CodecError };
pub use extract::{ Extracted, ListKind };
pub use model::{ Album, Artist, DjRadio, ModelError, Playlist, Song, User };
pub use paths::{ data_dir_path, home_dir, local_data_dir, PathsError };
pub use response::{ check_code, check_user_info, ResCode };
pub use text::replace_special_str;
