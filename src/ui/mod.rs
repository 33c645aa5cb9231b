//! Terminal output for the interactive commands
//!
//! `setup` and the integration commands report their steps with `cliclack`
//! when attached to a terminal and fall back to plain tagged lines in CI or
//! when piped. Commands whose stdout is consumed by scripts (`uri`, `path`,
//! `stats`) do not go through this module.
//!
//! ```rust,ignore
//! use basar::ui::{self, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect();
//! ui::intro(&ctx, "basar setup");
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Updating cache...");
//! spinner.stop("Cached 4123 banners");
//!
//! ui::outro_success(&ctx, "Setup complete");
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    intro, outro_success, outro_warn, step_info, step_ok, step_ok_detail, step_warn_hint,
};
pub use progress::TaskSpinner;
