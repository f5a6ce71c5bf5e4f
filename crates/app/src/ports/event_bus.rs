//! Event bus port — publish side of the representation fan-out.

use std::future::Future;

use robovac_domain::error::RobovacError;
use robovac_domain::event::Event;

/// Publishes representation-update events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), RobovacError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), RobovacError>> + Send {
        (**self).publish(event)
    }
}
