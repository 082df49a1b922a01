use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;

pub fn default_pbar_style() -> Result<ProgressStyle, Box<dyn Error>> {
    let pbar = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {wide_bar} {pos}/{len} {msg}")?
        .progress_chars("=> ");
    Ok(pbar)
}

/// Bar over `len` plots, styled like every other bar in the workspace.
pub fn plot_pbar(len: usize, message: &'static str) -> Result<ProgressBar, Box<dyn Error>> {
    let pbar = ProgressBar::new(len as u64);
    pbar.set_style(default_pbar_style()?);
    pbar.set_message(message);
    Ok(pbar)
}
