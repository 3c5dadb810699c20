//! Headless invocation arguments
//!
//! Arguments come in as single-dash flags with an optional following value:
//! `-builder Release -override {...}`. A flag directly followed by another
//! flag has an empty value. The scan is left to right and the last
//! occurrence of a repeated flag wins.

use std::collections::HashMap;

pub const OPT_BUILDER: &str = "-builder";
/// Cloud build services pass the builder name here, with spaces encoded as
/// dashes. Takes precedence over [`OPT_BUILDER`].
pub const OPT_CLOUD_BUILDER: &str = "-bvrbuildtarget";
pub const OPT_APPEND_SYMBOLS: &str = "-appendSymbols";
pub const OPT_OVERRIDE: &str = "-override";
pub const OPT_DEV_BUILD_NUM: &str = "-devBuildNumber";

/// Parsed flag/value pairs from a headless command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteArgs {
    options: HashMap<String, String>,
}

impl ExecuteArgs {
    /// Parse from the process arguments, skipping the program name.
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = HashMap::new();
        let mut pending: Option<String> = None;

        for arg in args {
            let arg = arg.into();
            if arg.starts_with('-') {
                if let Some(flag) = pending.take() {
                    options.insert(flag, String::new());
                }
                pending = Some(arg);
            } else if let Some(flag) = pending.take() {
                options.insert(flag, arg);
            }
            // Values with no preceding flag are ignored.
        }
        if let Some(flag) = pending {
            options.insert(flag, String::new());
        }

        Self { options }
    }

    pub fn get(&self, flag: &str) -> Option<&str> {
        self.options.get(flag).map(String::as_str)
    }

    fn get_non_empty(&self, flag: &str) -> Option<&str> {
        self.get(flag).filter(|value| !value.is_empty())
    }

    /// The profile to build. The cloud-service flag wins over `-builder`,
    /// with its dash-encoded spaces decoded.
    pub fn builder_name(&self) -> Option<String> {
        if let Some(cloud) = self.get_non_empty(OPT_CLOUD_BUILDER) {
            return Some(cloud.replace('-', " "));
        }
        self.get_non_empty(OPT_BUILDER).map(str::to_string)
    }

    /// Extra define symbols appended for this invocation
    pub fn append_symbols(&self) -> Option<&str> {
        self.get_non_empty(OPT_APPEND_SYMBOLS)
    }

    /// One-shot JSON profile patch
    pub fn override_json(&self) -> Option<&str> {
        self.get_non_empty(OPT_OVERRIDE)
    }

    /// Development build number stamped into the version suffix
    pub fn dev_build_number(&self) -> Option<&str> {
        self.get_non_empty(OPT_DEV_BUILD_NUM)
    }
}
