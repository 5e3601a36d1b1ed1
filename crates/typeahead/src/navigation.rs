//! Translation of raw keyboard and pointer input into selection events.
//!
//! The host forwards whatever its toolkit delivers as [`InputEvent`]s.
//! [`NavigationController`] decides which of them mean something to the
//! selection state and which are ignored in the current context.

use unicode_segmentation::UnicodeSegmentation;

use typeahead_core::logging::targets;

use crate::state::SelectionEvent;

/// Keys the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Escape,
    Backspace,
    /// A printable character typed into the input.
    Character(char),
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// An option row, by index into the visible candidates.
    Option(usize),
    /// The text input.
    Input,
    /// The clear affordance.
    ClearButton,
    /// Panel chrome that is not an option row.
    Panel,
    /// Anywhere outside the widget.
    Outside,
}

/// Raw input delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed while the input had focus.
    KeyPress(Key),
    /// The host text field reports its full new text.
    TextChanged(String),
    /// A pointer button went down.
    PointerDown(PointerTarget),
    /// The pointer moved.
    PointerMove(PointerTarget),
    /// The input gained focus.
    Focus,
    /// The input lost focus.
    Blur,
}

/// What the controller needs to know about the widget to translate input.
#[derive(Debug, Clone, Copy)]
pub struct NavContext<'a> {
    /// Whether the option panel is shown.
    pub panel_visible: bool,
    /// Current input text, for character and backspace handling.
    pub query_text: &'a str,
}

/// Maps [`InputEvent`]s to [`SelectionEvent`]s.
#[derive(Debug, Clone)]
pub struct NavigationController {
    page_size: usize,
    close_on_escape: bool,
}

impl NavigationController {
    /// Create a controller. `page_size` is the PageUp/PageDown step.
    pub fn new(page_size: usize, close_on_escape: bool) -> Self {
        Self {
            page_size: page_size.max(1),
            close_on_escape,
        }
    }

    /// The PageUp/PageDown step.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Translate one input event. `None` means the event is ignored.
    pub fn translate<T>(&self, event: InputEvent, ctx: NavContext<'_>) -> Option<SelectionEvent<T>> {
        let translated = match event {
            InputEvent::KeyPress(key) => self.translate_key(key, ctx),
            InputEvent::TextChanged(text) => Some(SelectionEvent::TextEdited(text)),
            InputEvent::PointerDown(target) => match target {
                PointerTarget::Option(index) if ctx.panel_visible => {
                    Some(SelectionEvent::Activate(index))
                }
                PointerTarget::Option(_) | PointerTarget::Panel => None,
                PointerTarget::Input => Some(SelectionEvent::Focused),
                PointerTarget::ClearButton => Some(SelectionEvent::Cleared),
                PointerTarget::Outside => {
                    ctx.panel_visible.then_some(SelectionEvent::PointerDownOutside)
                }
            },
            InputEvent::PointerMove(PointerTarget::Option(index)) if ctx.panel_visible => {
                Some(SelectionEvent::Hover(index))
            }
            InputEvent::PointerMove(_) => None,
            InputEvent::Focus => (!ctx.panel_visible).then_some(SelectionEvent::Focused),
            // Closing is left to the outside-pointer watch so that a press on
            // an option is never lost to the blur that precedes it.
            InputEvent::Blur => None,
        };

        if translated.is_none() {
            tracing::trace!(target: targets::NAVIGATION, panel_visible = ctx.panel_visible, "input ignored");
        }
        translated
    }

    fn translate_key<T>(&self, key: Key, ctx: NavContext<'_>) -> Option<SelectionEvent<T>> {
        match key {
            Key::Character(ch) => {
                if ch.is_control() {
                    return None;
                }
                let mut text = ctx.query_text.to_string();
                text.push(ch);
                Some(SelectionEvent::TextEdited(text))
            }
            Key::Backspace => {
                let (start, _) = ctx.query_text.grapheme_indices(true).next_back()?;
                Some(SelectionEvent::TextEdited(ctx.query_text[..start].to_string()))
            }
            _ if !ctx.panel_visible => None,
            Key::ArrowDown => Some(SelectionEvent::ArrowDown),
            Key::ArrowUp => Some(SelectionEvent::ArrowUp),
            Key::PageDown => Some(SelectionEvent::PageDown(self.page_size)),
            Key::PageUp => Some(SelectionEvent::PageUp(self.page_size)),
            Key::Home => Some(SelectionEvent::Home),
            Key::End => Some(SelectionEvent::End),
            Key::Enter => Some(SelectionEvent::Enter),
            Key::Escape => self.close_on_escape.then_some(SelectionEvent::Escape),
        }
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(7, true)
    }
}
