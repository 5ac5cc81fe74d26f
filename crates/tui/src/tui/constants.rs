use std::time::Duration;

pub(crate) const APP_NAME: &str = "dewy";
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const HELP_TOKEN: &str = "?";
pub(crate) const HINT_PAD: usize = 26;
pub(crate) const FIELD_LABEL_PAD: usize = 14;

pub(crate) const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(crate) const HINT_IDLE: &str = "  type ? for help";
pub(crate) const HINT_NAVIGATE: &str = "  Enter to edit ∙ Escape to go back";
pub(crate) const HINT_EDITING: &str = "  Enter to save ∙ Escape to cancel";
pub(crate) const EDIT_FIELDS_USAGE: &str = "due|p1-p4|labels|desc|project|title";
