//! Core types for spark-controls.
//!
//! These types define what a control is (its method), what it shows (its
//! status) and what it sends to a mixer (a command).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseMethodError;

// =============================================================================
// Command Fields (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Which fields of a [`Command`] a control method populates.
    ///
    /// `MultiMix` controls populate both: `CommandFields::FILTER | CommandFields::SORT`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CommandFields: u8 {
        const NONE = 0;
        const FILTER = 1 << 0;
        const SORT = 1 << 1;
    }
}

// =============================================================================
// Control Method
// =============================================================================

/// The command semantics of a control. Fixed at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlMethod {
    /// Replace the active filter.
    Filter,
    /// Replace the active sort.
    Sort,
    /// Add or remove one selector from the set of active toggles.
    Toggle,
    /// Replace filter and sort together.
    MultiMix,
}

impl ControlMethod {
    /// Command fields this method reads from the element and sends to mixers.
    pub const fn fields(self) -> CommandFields {
        match self {
            Self::Filter | Self::Toggle => CommandFields::FILTER,
            Self::Sort => CommandFields::SORT,
            Self::MultiMix => CommandFields::FILTER.union(CommandFields::SORT),
        }
    }

    /// Name as used in markup and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Sort => "sort",
            Self::Toggle => "toggle",
            Self::MultiMix => "multiMix",
        }
    }
}

impl fmt::Display for ControlMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filter" => Ok(Self::Filter),
            "sort" => Ok(Self::Sort),
            "toggle" => Ok(Self::Toggle),
            "multiMix" | "multimix" => Ok(Self::MultiMix),
            other => Err(ParseMethodError(other.to_string())),
        }
    }
}

// =============================================================================
// Control Status
// =============================================================================

/// Displayed state of a control.
///
/// `Live` is permanent for delegated (selector-based) controls. All other
/// controls move between `Inactive`, `Active` and `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlStatus {
    #[default]
    Inactive,
    Active,
    Disabled,
    Live,
}

impl ControlStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Command
// =============================================================================

/// A filter/sort command sent to mixers, and reported back on completion.
///
/// Fields a control's method does not populate stay `None`. Mixers usually
/// report back a fully resolved command with both fields set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Command {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Command {
    /// Command carrying only a filter.
    pub fn filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            sort: None,
        }
    }

    /// Command carrying only a sort.
    pub fn sort(sort: impl Into<String>) -> Self {
        Self {
            filter: None,
            sort: Some(sort.into()),
        }
    }

    /// Command carrying both a filter and a sort.
    pub fn multi_mix(filter: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            sort: Some(sort.into()),
        }
    }

    /// Which fields are populated.
    pub fn fields(&self) -> CommandFields {
        let mut fields = CommandFields::NONE;
        if self.filter.is_some() {
            fields |= CommandFields::FILTER;
        }
        if self.sort.is_some() {
            fields |= CommandFields::SORT;
        }
        fields
    }

    /// True when `filter` equals `value` exactly.
    pub fn filter_is(&self, value: &str) -> bool {
        self.filter.as_deref() == Some(value)
    }

    /// True when `sort` equals `value` exactly.
    pub fn sort_is(&self, value: &str) -> bool {
        self.sort.as_deref() == Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_fields() {
        assert_eq!(ControlMethod::Filter.fields(), CommandFields::FILTER);
        assert_eq!(ControlMethod::Toggle.fields(), CommandFields::FILTER);
        assert_eq!(ControlMethod::Sort.fields(), CommandFields::SORT);
        assert_eq!(
            ControlMethod::MultiMix.fields(),
            CommandFields::FILTER | CommandFields::SORT
        );
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("filter".parse::<ControlMethod>().unwrap(), ControlMethod::Filter);
        assert_eq!("multiMix".parse::<ControlMethod>().unwrap(), ControlMethod::MultiMix);
        assert_eq!(ControlMethod::MultiMix.to_string(), "multiMix");

        let err = "shuffle".parse::<ControlMethod>().unwrap_err();
        assert_eq!(err.to_string(), "unknown control method `shuffle`");
    }

    #[test]
    fn test_command_fields_and_matching() {
        let cmd = Command::filter(".category-a");
        assert_eq!(cmd.fields(), CommandFields::FILTER);
        assert!(cmd.filter_is(".category-a"));
        assert!(!cmd.filter_is(".category-b"));
        assert!(!cmd.sort_is(""));

        let cmd = Command::multi_mix(".a", "name:asc");
        assert_eq!(cmd.fields(), CommandFields::FILTER | CommandFields::SORT);
        assert!(cmd.sort_is("name:asc"));
    }

    #[test]
    fn test_command_serde_skips_missing_fields() {
        let json = serde_json::to_string(&Command::sort("date")).unwrap();
        assert_eq!(json, r#"{"sort":"date"}"#);

        let cmd: Command = serde_json::from_str(r#"{"filter":".x"}"#).unwrap();
        assert_eq!(cmd, Command::filter(".x"));
    }
}
