//! Well-known keys used inside event data bags.
//!
//! Producers must use these exact keys. Anything else is stored with the
//! document but never promoted into the searchable schema.

/// Keys of the event's top-level data bag.
pub mod data {
    pub const VERSION: &str = "@version";
    pub const LEVEL: &str = "@level";
    pub const SUBMISSION_METHOD: &str = "@submission_method";
    pub const LOCATION: &str = "@location";
    pub const REQUEST_INFO: &str = "@request";
    pub const ERROR: &str = "@error";
    pub const SIMPLE_ERROR: &str = "@simple_error";
    pub const ENVIRONMENT_INFO: &str = "@environment";
    pub const USER_DESCRIPTION: &str = "@user_description";
    pub const USER_INFO: &str = "@user";
}

/// Keys of the data bag nested inside request info.
pub mod request {
    pub const BROWSER: &str = "@browser";
    pub const BROWSER_VERSION: &str = "@browser_version";
    pub const BROWSER_MAJOR_VERSION: &str = "@browser_major_version";
    pub const DEVICE: &str = "@device";
    pub const OS: &str = "@os";
    pub const OS_VERSION: &str = "@os_version";
    pub const OS_MAJOR_VERSION: &str = "@os_major_version";
    pub const IS_BOT: &str = "@is_bot";
}

/// Keys of the data bag nested inside an error node.
pub mod error {
    /// Target site of the exception (`ExceptionType`, `Method`).
    pub const TARGET_INFO: &str = "@target";
}
