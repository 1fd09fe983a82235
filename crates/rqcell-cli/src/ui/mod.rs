//! Status lines on stderr
//!
//! ```no_run
//! use rqcell_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Wrapped 3 cells");
//! ```

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{error, info, success, summary, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Respects NO_COLOR and FORCE_COLOR, then checks whether stderr is a terminal
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Decide once whether status lines are colored
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
