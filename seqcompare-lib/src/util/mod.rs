pub mod io;
pub mod sequence;
pub mod version;
