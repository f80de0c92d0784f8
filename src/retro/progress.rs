//! Progress bars for the build and solve phases.

use indicatif::{ProgressBar, ProgressStyle};

/// A bar of `len` steps labelled `label`, or a hidden bar when disabled.
pub(crate) fn bar(len: u64, label: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let template = format!(
        "[{{elapsed_precise}}] {} {{bar:40.cyan/blue}} {{pos}}/{{len}}",
        label
    );
    if let Ok(style) = ProgressStyle::with_template(&template) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
