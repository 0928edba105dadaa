pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{get_claude_dir, get_default_chrome_dir, get_projects_dir};
pub use paths::{
    decode_project_dir, encode_project_dir, encode_project_dir_strict, format_path_with_tilde,
};
pub use terminal::strip_ansi_codes;
