use std::time::{Duration, Instant};

/// Delay before a toast starts sliding in
pub const ENTER_DELAY: Duration = Duration::from_millis(10);
/// Length of the slide in/out transition
pub const TRANSITION: Duration = Duration::from_millis(300);
pub const DEFAULT_DURATION: Duration = Duration::from_secs(3);
pub const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    /// Toast background colour as RGB
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Success => (0x10, 0xb9, 0x81),
            Self::Error => (0xef, 0x44, 0x44),
            Self::Warning => (0xf5, 0x9e, 0x0b),
            Self::Info => (0x63, 0x66, 0xf1),
        }
    }
}

/// Where a toast is in its show/hide animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastPhase {
    /// Sliding in; progress goes 0.0 -> 1.0
    Entering(f32),
    Visible,
    /// Sliding out; progress goes 0.0 -> 1.0
    Leaving(f32),
    Gone,
}

impl ToastPhase {
    /// Fraction of the toast that is on screen (0.0 hidden, 1.0 fully shown)
    pub fn visibility(self) -> f32 {
        match self {
            Self::Entering(p) => p,
            Self::Visible => 1.0,
            Self::Leaving(p) => 1.0 - p,
            Self::Gone => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel, duration: Duration) -> Self {
        Self::new_at(message, level, duration, Instant::now())
    }

    pub fn new_at(
        message: impl Into<String>,
        level: NotificationLevel,
        duration: Duration,
        now: Instant,
    ) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: now,
            expires_at: now + duration,
        }
    }

    pub fn phase_at(&self, now: Instant) -> ToastPhase {
        let shown_at = self.created_at + ENTER_DELAY;
        if now < shown_at {
            return ToastPhase::Entering(0.0);
        }
        let since_shown = now - shown_at;
        if since_shown < TRANSITION {
            return ToastPhase::Entering(fraction(since_shown));
        }
        if now < self.expires_at {
            return ToastPhase::Visible;
        }
        let since_expiry = now - self.expires_at;
        if since_expiry < TRANSITION {
            ToastPhase::Leaving(fraction(since_expiry))
        } else {
            ToastPhase::Gone
        }
    }

    pub fn phase(&self) -> ToastPhase {
        self.phase_at(Instant::now())
    }

    /// A toast is discarded once its slide-out has finished
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at + TRANSITION
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn time_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

fn fraction(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() / TRANSITION.as_secs_f32()).clamp(0.0, 1.0)
}

/// Anything that can accept a user-facing message
pub trait Notifier {
    fn notify(&mut self, message: String, level: NotificationLevel);
}

/// A message waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notifier for Vec<Notice> {
    fn notify(&mut self, message: String, level: NotificationLevel) {
        self.push(Notice { message, level });
    }
}

/// Stack of transient toasts, newest first, bounded by `capacity`
#[derive(Debug)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
    default_duration: Duration,
    capacity: usize,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DURATION, DEFAULT_CAPACITY)
    }

    pub fn with_config(default_duration: Duration, capacity: usize) -> Self {
        Self {
            notifications: Vec::new(),
            default_duration,
            capacity: capacity.max(1),
        }
    }

    pub fn notify_for(
        &mut self,
        message: impl Into<String>,
        level: NotificationLevel,
        duration: Duration,
    ) {
        self.show(Notification::new(message, level, duration));
    }

    pub fn show(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
        // Oldest toasts are evicted first
        self.notifications.truncate(self.capacity);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message.into(), NotificationLevel::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message.into(), NotificationLevel::Success);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.notify(message.into(), NotificationLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message.into(), NotificationLevel::Error);
    }

    /// Remove expired notifications, returns true if any were removed
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    pub fn update_at(&mut self, now: Instant) -> bool {
        let initial_len = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired_at(now));
        self.notifications.len() != initial_len
    }

    pub fn current(&self) -> Option<&Notification> {
        self.notifications.first()
    }

    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    pub fn dismiss_current(&mut self) -> bool {
        if self.notifications.is_empty() {
            false
        } else {
            self.notifications.remove(0);
            true
        }
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    pub fn count(&self) -> usize {
        self.notifications.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Notifier for NotificationManager {
    fn notify(&mut self, message: String, level: NotificationLevel) {
        self.notify_for(message, level, self.default_duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn notification_expiration() {
        let notification =
            Notification::new("test", NotificationLevel::Info, Duration::from_millis(50));
        assert!(!notification.is_expired());

        thread::sleep(Duration::from_millis(60) + TRANSITION);
        assert!(notification.is_expired());
    }

    #[test]
    fn phases_follow_slide_in_hold_slide_out() {
        let start = Instant::now();
        let toast = Notification::new_at(
            "hola",
            NotificationLevel::Success,
            DEFAULT_DURATION,
            start,
        );

        assert_eq!(toast.phase_at(start), ToastPhase::Entering(0.0));
        assert!(matches!(
            toast.phase_at(start + ENTER_DELAY + TRANSITION / 2),
            ToastPhase::Entering(p) if (p - 0.5).abs() < 0.01
        ));
        assert_eq!(
            toast.phase_at(start + Duration::from_secs(1)),
            ToastPhase::Visible
        );
        assert!(matches!(
            toast.phase_at(start + DEFAULT_DURATION + Duration::from_millis(150)),
            ToastPhase::Leaving(_)
        ));
        assert_eq!(
            toast.phase_at(start + DEFAULT_DURATION + TRANSITION),
            ToastPhase::Gone
        );
        assert!(toast.is_expired_at(start + DEFAULT_DURATION + TRANSITION));
        assert!(!toast.is_expired_at(start + DEFAULT_DURATION));
    }

    #[test]
    fn manager_adds_and_retrieves() {
        let mut manager = NotificationManager::new();

        manager.info("First");
        manager.warn("Second");
        manager.error("Third");

        assert_eq!(manager.count(), 3);

        let current = manager.current().unwrap();
        assert_eq!(current.message, "Third");
        assert_eq!(current.level, NotificationLevel::Error);
    }

    #[test]
    fn manager_removes_expired() {
        let mut manager = NotificationManager::with_config(Duration::from_millis(50), 5);

        manager.info("Short-lived");
        assert_eq!(manager.count(), 1);

        let later = Instant::now() + Duration::from_millis(60) + TRANSITION;
        assert!(manager.update_at(later));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn manager_evicts_oldest_beyond_capacity() {
        let mut manager = NotificationManager::with_config(DEFAULT_DURATION, 3);

        for i in 0..10 {
            manager.info(format!("toast {i}"));
            assert!(manager.count() <= 3);
        }

        let messages: Vec<_> = manager.all().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["toast 9", "toast 8", "toast 7"]);
    }

    #[test]
    fn manager_dismiss_current() {
        let mut manager = NotificationManager::new();

        manager.info("First");
        manager.success("Second");

        assert!(manager.dismiss_current());
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.current().unwrap().message, "First");

        assert!(manager.dismiss_current());
        assert!(!manager.dismiss_current());
        assert!(!manager.has_notifications());
    }

    #[test]
    fn notice_outbox_collects_messages() {
        let mut outbox: Vec<Notice> = Vec::new();
        outbox.notify("uno".into(), NotificationLevel::Warning);

        assert_eq!(
            outbox,
            vec![Notice {
                message: "uno".into(),
                level: NotificationLevel::Warning,
            }]
        );
    }
}
