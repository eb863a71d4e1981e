pub mod filter;
pub mod listing;
pub mod purge;

pub use filter::{
    filter_system_files, is_system_file, is_visible, object_path, system_file_paths,
    EMPTY_FOLDER_PLACEHOLDER,
};
pub use listing::list_files;
pub use purge::{cleanup_system_files, plan_cleanup, PurgeReport};
