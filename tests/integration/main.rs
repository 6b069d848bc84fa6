#![allow(clippy::module_name_repetitions)]
#![forbid(non_ascii_idents, unsafe_code)]

mod get_cameras;
mod host;
mod negotiate_stream;
