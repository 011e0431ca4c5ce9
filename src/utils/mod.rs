pub mod encoding;
pub mod url;
