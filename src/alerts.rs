//! Notification sink shared by every controller.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Danger,
}

impl AlertKind {
    pub fn css_class(self) -> &'static str {
        match self {
            AlertKind::Success => "alert alert-success",
            AlertKind::Warning => "alert alert-warning",
            AlertKind::Danger => "alert alert-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

/// Fire-and-forget user notifications.
pub trait AlertSink {
    fn new_alert(&self, kind: AlertKind, title: &str, message: &str);
}

impl<T: AlertSink + ?Sized> AlertSink for std::rc::Rc<T> {
    fn new_alert(&self, kind: AlertKind, title: &str, message: &str) {
        (**self).new_alert(kind, title, message)
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::cell::RefCell;

    /// Keeps every alert for later assertions.
    #[derive(Default)]
    pub struct RecordingAlerts {
        pub alerts: RefCell<Vec<(AlertKind, String, String)>>,
    }

    impl RecordingAlerts {
        pub fn titles(&self) -> Vec<String> {
            self.alerts.borrow().iter().map(|(_, t, _)| t.clone()).collect()
        }

        pub fn len(&self) -> usize {
            self.alerts.borrow().len()
        }
    }

    impl AlertSink for RecordingAlerts {
        fn new_alert(&self, kind: AlertKind, title: &str, message: &str) {
            self.alerts
                .borrow_mut()
                .push((kind, title.to_string(), message.to_string()));
        }
    }
}
