use ratatui::style::Color;
use std::time::{Duration, Instant};

/// Severity of a notification shown under the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Error,
}

impl NotificationType {
    fn timeout(&self) -> Duration {
        match self {
            NotificationType::Info => Duration::from_secs(3),
            NotificationType::Error => Duration::from_secs(10),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            NotificationType::Info => Color::Cyan,
            NotificationType::Error => Color::Red,
        }
    }
}

/// A message that dismisses itself after its type's timeout
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub timestamp: Instant,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    /// Used for advances that failed in the trigger listener
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            timestamp: Instant::now(),
        }
    }

    pub fn should_dismiss(&self) -> bool {
        self.timestamp.elapsed() > self.notification_type.timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_notification_is_kept() {
        let n = Notification::error("mutation 2 failed");
        assert!(!n.should_dismiss());
        assert_eq!(n.notification_type.color(), Color::Red);
    }

    #[test]
    fn test_expired_notification_is_dismissed() {
        let mut n = Notification::info("advanced");
        n.timestamp = Instant::now() - Duration::from_secs(4);
        assert!(n.should_dismiss());
    }
}
