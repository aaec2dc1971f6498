//! The command handler capability.

use crate::domain::Event;

/// A capability supplied by the embedder: given an action's input payload,
/// produce the result event.
///
/// Handlers run synchronously, one at a time, on the runtime's single flow
/// of control. Implemented for free by any `Fn(&str) -> Event` closure.
///
/// # Example
///
/// ```
/// use courier_pack::{Event, EventDef, Handler};
///
/// struct Greeter;
///
/// impl Handler for Greeter {
///     fn handle(&self, input: &str) -> Event {
///         Event::new(EventDef::new("Greeted"), format!("hello {input}"))
///     }
/// }
/// ```
pub trait Handler: Send + Sync {
    /// Process one action's input and produce the result event.
    fn handle(&self, input: &str) -> Event;
}

impl<F> Handler for F
where
    F: Fn(&str) -> Event + Send + Sync,
{
    fn handle(&self, input: &str) -> Event {
        self(input)
    }
}
