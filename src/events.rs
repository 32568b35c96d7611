//! Pointer hover events and the subscriptions that receive them.

use tokio::sync::mpsc;
use tracing::debug;

/// What the pointer is over: class tags of the hovered shape and of its parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerTarget {
    pub classes: Vec<String>,
    pub parent_classes: Vec<String>,
}

impl PointerTarget {
    pub fn new(classes: &[&str], parent_classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent_classes: parent_classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Pointer left every tagged shape.
    pub fn none() -> Self {
        Self::default()
    }

    /// Value of the first `prefix<number>` tag on the target.
    pub fn tagged_value(&self, prefix: &str) -> Option<f64> {
        tagged_value(&self.classes, prefix)
    }

    pub fn parent_tagged_value(&self, prefix: &str) -> Option<f64> {
        tagged_value(&self.parent_classes, prefix)
    }
}

fn tagged_value(classes: &[String], prefix: &str) -> Option<f64> {
    classes
        .iter()
        .filter_map(|c| c.strip_prefix(prefix))
        .find_map(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Handle returned by [`PointerHub::subscribe`]; events queue here until drained.
#[derive(Debug)]
pub struct PointerSubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<PointerTarget>,
}

impl PointerSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Take every event delivered since the last call.
    pub fn drain(&mut self) -> Vec<PointerTarget> {
        let mut events = Vec::new();
        while let Ok(target) = self.rx.try_recv() {
            events.push(target);
        }
        events
    }
}

/// Fan-out of pointer events to registered listeners.
#[derive(Debug, Default)]
pub struct PointerHub {
    next_id: u64,
    listeners: Vec<(u64, mpsc::UnboundedSender<PointerTarget>)>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> PointerSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, tx));
        debug!("Pointer listener {} registered", id);
        PointerSubscription { id, rx }
    }

    pub fn unsubscribe(&mut self, subscription: PointerSubscription) {
        self.listeners.retain(|(id, _)| *id != subscription.id);
        debug!("Pointer listener {} cancelled", subscription.id);
    }

    /// Deliver `target` to every live listener, pruning dropped ones.
    pub fn publish(&mut self, target: PointerTarget) {
        self.listeners
            .retain(|(_, tx)| tx.send(target.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_values() {
        let target = PointerTarget::new(&["cell", "tws-6"], &["twa-52.5"]);
        assert_eq!(target.tagged_value("tws-"), Some(6.0));
        assert_eq!(target.parent_tagged_value("twa-"), Some(52.5));
        assert_eq!(target.tagged_value("twa-"), None);
        assert_eq!(PointerTarget::new(&["tws-abc"], &[]).tagged_value("tws-"), None);
    }

    #[test]
    fn publish_reaches_subscribers_until_unsubscribed() {
        let mut hub = PointerHub::new();
        let mut sub = hub.subscribe();
        hub.publish(PointerTarget::none());
        assert_eq!(sub.drain().len(), 1);
        assert!(sub.drain().is_empty());

        let other = hub.subscribe();
        assert_eq!(hub.listener_count(), 2);
        hub.unsubscribe(other);
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let mut hub = PointerHub::new();
        drop(hub.subscribe());
        hub.publish(PointerTarget::none());
        assert_eq!(hub.listener_count(), 0);
    }
}
