pub mod dpi;
pub mod image;
pub mod path;
pub mod pbar;
