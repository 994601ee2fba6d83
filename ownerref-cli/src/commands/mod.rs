pub mod config_path;
pub mod init;
pub mod inject;
