//! Fixed english strings for the settings surface.

pub const SETTINGS_TITLE: &str = "Settings";
pub const FILTERS_TITLE: &str = "Filters";
pub const IGNORED_USERS_TITLE: &str = "Ignored Users";

pub const SHOW_TIMESTAMPS: &str = "Show the time of deletion";
pub const EW_TIMESTAMP_FORMAT: &str = "Use the edited-style timestamp format";
pub const IGNORE_BOTS: &str = "Ignore messages from bots";
pub const REMOVE_USER: &str = "Remove";

pub const YOU_DELETED_IT_WARNING: &str = "Your own deletions";
pub const YOU_DELETED_IT_SUBTITLE: &str = "Messages you delete yourself won't be preserved";

pub const ADD_USERS_INFO: &str = "Adding users";
pub const ADD_USERS_SUBTITLE: &str =
    "Open a user's profile and use the context menu to add them to the ignore list";

pub const CONFIRM_CLEAR_TITLE: &str = "Clear ignored users?";
pub const CONFIRM_CLEAR_YES: &str = "Clear";
pub const CONFIRM_CLEAR_NO: &str = "Cancel";

fn users(count: usize) -> String {
    if count == 1 {
        "1 user".to_owned()
    } else {
        format!("{count} users")
    }
}

pub fn clear_users_label(count: usize) -> String {
    format!("Clear the ignore list ({})", users(count))
}

pub fn confirm_clear_description(count: usize) -> String {
    format!(
        "This will remove {} from the ignore list. Their deleted messages will be preserved again.",
        users(count)
    )
}
