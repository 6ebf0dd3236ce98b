//! User-facing notices and injected collaborators.
//!
//! The editor core never talks to widgets directly. Notices and text entry
//! go through these traits; the GUI shell supplies toast and dialog backed
//! implementations, the tests supply recording or canned ones.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Receives short status messages ("Zoom: 120%", "Import failed: ...").
pub trait Notifier {
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Discards every notice. Default for headless use.
#[derive(Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _level: NoticeLevel, _message: &str) {}
}

/// Supplies the string for a text-tool stamp. Returning `None` aborts the
/// stamp without mutating the surface.
pub trait TextProvider {
    fn request_text(&mut self) -> Option<String>;
}

/// Never provides text. Default for headless use without a text source.
#[derive(Default)]
pub struct NoTextProvider;

impl TextProvider for NoTextProvider {
    fn request_text(&mut self) -> Option<String> {
        None
    }
}

/// Shared slot the GUI fills from its text prompt; the editor drains it on
/// the next text-tool click.
#[derive(Default, Clone)]
pub struct SharedTextInput(Rc<RefCell<Option<String>>>);

impl SharedTextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, text: String) {
        *self.0.borrow_mut() = Some(text);
    }
}

impl TextProvider for SharedTextInput {
    fn request_text(&mut self) -> Option<String> {
        self.0.borrow_mut().take()
    }
}
