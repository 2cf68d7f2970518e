//! Debounced health notification.
//!
//! The notification is recomputed every status cycle, but the alert method
//! set of an unresolved notification is sticky: once a fault has been raised
//! with a given set of channels, later cycles keep that set until the fault
//! clears or the set is explicitly overridden.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::snapshot::LinkHealth;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Normal,
    Alert,
    Warn,
    Alarm,
    Emergency,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Alert => "alert",
            Self::Warn => "warn",
            Self::Alarm => "alarm",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an outage level; `normal` is not a valid outage level.
impl FromStr for NotificationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alert" => Ok(Self::Alert),
            "warn" => Ok(Self::Warn),
            "alarm" => Ok(Self::Alarm),
            "emergency" => Ok(Self::Emergency),
            other => Err(format!(
                "'{}' is not one of alert, warn, alarm, emergency",
                other
            )),
        }
    }
}

/// Channel an alerting UI uses to present a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMethod {
    Visual,
    Sound,
}

/// Published notification value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRecord {
    pub state: NotificationLevel,
    pub method: BTreeSet<AlertMethod>,
    pub message: String,
}

/// Product name used in notification messages unless configured.
pub const DEFAULT_PROVIDER_NAME: &str = "Starlink";

/// Current notification plus the level used while the link is down.
#[derive(Debug, Clone)]
pub struct NotificationState {
    outage_level: NotificationLevel,
    provider_name: String,
    current: Option<NotificationRecord>,
}

impl NotificationState {
    pub fn new(outage_level: NotificationLevel) -> Self {
        Self {
            outage_level,
            provider_name: DEFAULT_PROVIDER_NAME.to_string(),
            current: None,
        }
    }

    /// Name shown in messages, e.g. `"<name> is offline"`.
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    fn default_methods() -> BTreeSet<AlertMethod> {
        [AlertMethod::Visual, AlertMethod::Sound].into_iter().collect()
    }

    /// Recompute from the latest classification and return the new record.
    pub fn update(&mut self, health: &LinkHealth) -> &NotificationRecord {
        let (state, message) = if health.is_online() {
            (NotificationLevel::Normal, format!("{} is online", self.provider_name))
        } else {
            (self.outage_level, format!("{} is offline", self.provider_name))
        };

        let method = match &self.current {
            Some(previous) if previous.state != NotificationLevel::Normal => previous.method.clone(),
            _ => Self::default_methods(),
        };

        self.current.insert(NotificationRecord {
            state,
            method,
            message,
        })
    }

    /// Replace the method set of the current notification.
    ///
    /// Returns `false` if there is no notification yet.
    pub fn override_method(&mut self, method: BTreeSet<AlertMethod>) -> bool {
        match self.current.as_mut() {
            Some(record) => {
                record.method = method;
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&NotificationRecord> {
        self.current.as_ref()
    }

    pub fn outage_level(&self) -> NotificationLevel {
        self.outage_level
    }
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::new(NotificationLevel::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outage() -> LinkHealth {
        LinkHealth::Outage {
            cause: "OBSTRUCTED".into(),
        }
    }

    #[test]
    fn test_online_is_normal() {
        let mut state = NotificationState::default();
        let record = state.update(&LinkHealth::Online);

        assert_eq!(record.state, NotificationLevel::Normal);
        assert_eq!(record.message, "Starlink is online");
        assert_eq!(record.method, NotificationState::default_methods());
    }

    #[test]
    fn test_outage_uses_configured_level() {
        let mut state = NotificationState::new(NotificationLevel::Alarm);
        let record = state.update(&outage());

        assert_eq!(record.state, NotificationLevel::Alarm);
        assert_eq!(record.message, "Starlink is offline");
    }

    #[test]
    fn test_messages_use_provider_name() {
        let mut state = NotificationState::new(NotificationLevel::Warn).with_provider_name("Aft dish");

        assert_eq!(state.update(&outage()).message, "Aft dish is offline");
        assert_eq!(state.update(&LinkHealth::Online).message, "Aft dish is online");
    }

    #[test]
    fn test_method_sticky_while_unresolved() {
        let mut state = NotificationState::default();
        state.update(&outage());

        let visual_only: BTreeSet<_> = [AlertMethod::Visual].into_iter().collect();
        assert!(state.override_method(visual_only.clone()));

        // Consecutive non-normal cycles keep the overridden set
        assert_eq!(state.update(&outage()).method, visual_only);
        assert_eq!(state.update(&outage()).method, visual_only);
    }

    #[test]
    fn test_method_resets_after_recovery() {
        let mut state = NotificationState::default();
        state.update(&outage());
        state.override_method([AlertMethod::Sound].into_iter().collect());

        state.update(&LinkHealth::Online);
        let record = state.update(&outage());
        assert_eq!(record.method, NotificationState::default_methods());
    }

    #[test]
    fn test_override_without_record() {
        let mut state = NotificationState::default();
        assert!(!state.override_method(BTreeSet::new()));
        assert!(state.current().is_none());
    }

    #[test]
    fn test_level_parse_rejects_normal() {
        assert_eq!("WARN".parse::<NotificationLevel>(), Ok(NotificationLevel::Warn));
        assert_eq!(
            "emergency".parse::<NotificationLevel>(),
            Ok(NotificationLevel::Emergency)
        );
        assert!("normal".parse::<NotificationLevel>().is_err());
    }

    #[test]
    fn test_record_serializes_lowercase() {
        let mut state = NotificationState::default();
        let record = state.update(&outage()).clone();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "state": "warn",
                "method": ["visual", "sound"],
                "message": "Starlink is offline"
            })
        );
    }
}
