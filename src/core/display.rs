//! Hand-off of rendered labels to the thread that owns the display

use crossbeam::channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use sysmon_types::IconDirective;

/// Icon change for the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconUpdate {
    Use(PathBuf),
    Clear,
}

impl From<IconDirective> for IconUpdate {
    fn from(directive: IconDirective) -> Self {
        match directive {
            IconDirective::Use(path) => IconUpdate::Use(path),
            IconDirective::Clear => IconUpdate::Clear,
        }
    }
}

/// One discrete change to apply on the display thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    Label(String),
    Icon(IconUpdate),
}

/// Receiver of display updates.
///
/// Called from the fetch worker. Implementations must not touch UI state
/// directly; they hand the update to the display thread.
pub trait DisplaySink: Send + Sync {
    fn deliver(&self, update: DisplayUpdate);
}

/// Forwards updates over a channel; the display thread drains the receiver
/// and applies updates in the order they were sent.
#[derive(Clone)]
pub struct ChannelSink {
    sender: Sender<DisplayUpdate>,
}

impl ChannelSink {
    /// Create a sink and the receiver the display thread reads from
    pub fn new() -> (Self, Receiver<DisplayUpdate>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl DisplaySink for ChannelSink {
    fn deliver(&self, update: DisplayUpdate) {
        let update = match update {
            DisplayUpdate::Label(label) => {
                let label = label.trim();
                if label.is_empty() {
                    log::debug!("Skipping empty label");
                    return;
                }
                DisplayUpdate::Label(label.to_string())
            }
            other => other,
        };
        if self.sender.send(update).is_err() {
            log::debug!("Display receiver dropped, update discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_trimmed_and_ordered() {
        let (sink, receiver) = ChannelSink::new();
        sink.deliver(DisplayUpdate::Icon(IconUpdate::Clear));
        sink.deliver(DisplayUpdate::Label("  cpu: 07%  ".to_string()));
        sink.deliver(DisplayUpdate::Label("cpu: 09%".to_string()));

        let updates: Vec<DisplayUpdate> = receiver.try_iter().collect();
        assert_eq!(
            updates,
            vec![
                DisplayUpdate::Icon(IconUpdate::Clear),
                DisplayUpdate::Label("cpu: 07%".to_string()),
                DisplayUpdate::Label("cpu: 09%".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_label_not_delivered() {
        let (sink, receiver) = ChannelSink::new();
        sink.deliver(DisplayUpdate::Label("   ".to_string()));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (sink, receiver) = ChannelSink::new();
        drop(receiver);
        sink.deliver(DisplayUpdate::Label("ignored".to_string()));
    }

    #[test]
    fn test_icon_directive_conversion() {
        let path = PathBuf::from("/tmp/icon.png");
        assert_eq!(IconUpdate::from(IconDirective::Use(path.clone())), IconUpdate::Use(path));
        assert_eq!(IconUpdate::from(IconDirective::Clear), IconUpdate::Clear);
    }
}
