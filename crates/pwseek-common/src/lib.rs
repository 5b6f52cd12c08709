pub mod format;
pub mod resource;
pub mod salt;
pub mod token;
