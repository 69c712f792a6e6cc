pub mod audio;
pub mod erb;
pub mod profile;
