// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presenter trait for rendering in-app messages, and the completion
//! contract the presenter reports dismissals through.

use std::fmt;

use tracing::warn;

use crate::message::Message;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Anchor, MessageId};

/// How a presented message left the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// Dismissed without a button: timeout, swipe, or close button.
    Advance,
    /// The user tapped the action button at `index`.
    ButtonPressed { index: usize },
}

type Signal = Box<dyn FnOnce(Dismissal) + Send + 'static>;

/// One-shot completion handed to the presenter with each message.
///
/// Both signalling methods consume the completion, so a presenter can report
/// at most one dismissal. Dropping it without a signal counts as
/// [`Dismissal::Advance`] so the queue never stalls.
pub struct Completion {
    message_id: MessageId,
    signal: Option<Signal>,
}

impl Completion {
    /// Creates a completion that invokes `signal` exactly once.
    pub fn new(message_id: MessageId, signal: impl FnOnce(Dismissal) + Send + 'static) -> Self {
        Self {
            message_id,
            signal: Some(Box::new(signal)),
        }
    }

    /// The message this completion belongs to.
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// The message was dismissed without a button press.
    pub fn advance(mut self) {
        self.fire(Dismissal::Advance);
    }

    /// The user pressed the button at `index`; the rest of the batch is abandoned.
    pub fn button_pressed(mut self, index: usize) {
        self.fire(Dismissal::ButtonPressed { index });
    }

    fn fire(&mut self, dismissal: Dismissal) {
        if let Some(signal) = self.signal.take() {
            signal(dismissal);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.signal.is_some() {
            warn!(
                message_id = %self.message_id,
                "completion dropped without a dismissal signal, advancing"
            );
            self.fire(Dismissal::Advance);
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("message_id", &self.message_id)
            .field("pending", &self.signal.is_some())
            .finish()
    }
}

/// Renders in-app messages on top of the host application.
///
/// Rendering, styling, animation, and gestures live entirely in the
/// implementation. `present` must return promptly and report the dismissal
/// later through the [`Completion`].
pub trait Presenter: PluginAdapter {
    /// The live screen to present onto, or `None` if nothing is visible yet.
    fn topmost_anchor(&self) -> Option<Anchor>;

    /// Starts displaying `message` over `anchor`.
    fn present(&self, message: Message, anchor: Anchor, completion: Completion);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_completion() -> (Completion, Arc<Mutex<Vec<Dismissal>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let completion = Completion::new(MessageId(5), move |d| sink.lock().unwrap().push(d));
        (completion, seen)
    }

    #[test]
    fn advance_fires_once() {
        let (completion, seen) = recording_completion();
        completion.advance();
        assert_eq!(*seen.lock().unwrap(), vec![Dismissal::Advance]);
    }

    #[test]
    fn button_press_carries_index() {
        let (completion, seen) = recording_completion();
        assert_eq!(completion.message_id(), MessageId(5));
        completion.button_pressed(1);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Dismissal::ButtonPressed { index: 1 }]
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn dropped_completion_advances() {
        let (completion, seen) = recording_completion();
        drop(completion);
        assert_eq!(*seen.lock().unwrap(), vec![Dismissal::Advance]);
        assert!(logs_contain("completion dropped without a dismissal signal"));
    }
}
