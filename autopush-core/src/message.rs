use chrono::{DateTime, Local};
use std::fmt;

pub const DEFAULT_PREFIX: &str = "Auto-commit: ";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Commit message made of a fixed prefix and the local time of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    pub fn now(prefix: &str, format: &str) -> Self {
        Self::at(prefix, format, Local::now())
    }

    pub fn at(prefix: &str, format: &str, time: DateTime<Local>) -> Self {
        Self(format!("{}{}", prefix, time.format(format)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_message_with_defaults() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let message = CommitMessage::at(DEFAULT_PREFIX, DEFAULT_TIMESTAMP_FORMAT, time);

        assert_eq!(message.as_str(), "Auto-commit: 2024-03-09 14:05:07");
    }

    #[test]
    fn test_message_with_custom_format() {
        let time = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        let message = CommitMessage::at("Sauvegarde du ", "%d/%m/%Y à %H:%M", time);

        assert_eq!(message.to_string(), "Sauvegarde du 31/12/2024 à 23:59");
    }

    #[test]
    fn test_messages_differ_across_seconds() {
        let first = Local.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let second = Local.with_ymd_and_hms(2024, 1, 1, 8, 0, 1).unwrap();

        assert_ne!(
            CommitMessage::at(DEFAULT_PREFIX, DEFAULT_TIMESTAMP_FORMAT, first),
            CommitMessage::at(DEFAULT_PREFIX, DEFAULT_TIMESTAMP_FORMAT, second)
        );
    }

    #[test]
    fn test_now_starts_with_prefix() {
        let message = CommitMessage::now(DEFAULT_PREFIX, DEFAULT_TIMESTAMP_FORMAT);
        assert!(message.as_str().starts_with(DEFAULT_PREFIX));
        assert!(message.as_str().len() > DEFAULT_PREFIX.len());
    }
}
