//! Input events and keyboard shortcut mapping.
//!
//! The editor consumes a single event stream; the GUI shell and the tests
//! both feed it through [`crate::editor::Editor::handle_event`], so every
//! interaction is a reproducible sequence of `InputEvent`s.

use egui::{Key, Modifiers, Pos2};

use crate::tools::Tool;

/// One unit of user input, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Pos2 },
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2 },
    /// Airbrush timer tick, emitted every 25 ms while spraying.
    AirbrushTick,
    Command(Command),
}

/// A discrete editor command, usually produced by a keyboard shortcut or a
/// toolbar button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Open,
    Save,
    Undo,
    Redo,
    SelectAll,
    ClearSelection,
    CancelSelection,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    SetBrushSize(u32),
    SetTool(Tool),
}

/// Map a key press to a command, or `None` if the key is unbound.
///
/// The caller is responsible for suppressing this while a text field holds
/// keyboard focus.
pub fn shortcut_command(key: Key, modifiers: Modifiers) -> Option<Command> {
    if modifiers.command {
        return match key {
            Key::O => Some(Command::Open),
            Key::S => Some(Command::Save),
            Key::Z if modifiers.shift => Some(Command::Redo),
            Key::Z => Some(Command::Undo),
            Key::Y => Some(Command::Redo),
            Key::A => Some(Command::SelectAll),
            _ => None,
        };
    }
    if modifiers.any() {
        return None;
    }
    match key {
        Key::Delete | Key::Backspace => Some(Command::ClearSelection),
        Key::Escape => Some(Command::CancelSelection),
        Key::PlusEquals => Some(Command::ZoomIn),
        Key::Minus => Some(Command::ZoomOut),
        Key::Num0 => Some(Command::ZoomReset),
        Key::Num1 => Some(Command::SetBrushSize(1)),
        Key::Num2 => Some(Command::SetBrushSize(2)),
        Key::Num3 => Some(Command::SetBrushSize(3)),
        Key::Num4 => Some(Command::SetBrushSize(4)),
        Key::Num5 => Some(Command::SetBrushSize(5)),
        Key::Num6 => Some(Command::SetBrushSize(6)),
        Key::Num7 => Some(Command::SetBrushSize(7)),
        Key::Num8 => Some(Command::SetBrushSize(8)),
        Key::Num9 => Some(Command::SetBrushSize(9)),
        Key::B => Some(Command::SetTool(Tool::Brush)),
        Key::E => Some(Command::SetTool(Tool::Eraser)),
        Key::F => Some(Command::SetTool(Tool::Fill)),
        Key::L => Some(Command::SetTool(Tool::Line)),
        Key::R => Some(Command::SetTool(Tool::Rectangle)),
        Key::C => Some(Command::SetTool(Tool::Circle)),
        Key::T => Some(Command::SetTool(Tool::Text)),
        Key::P => Some(Command::SetTool(Tool::Pencil)),
        Key::A => Some(Command::SetTool(Tool::Airbrush)),
        Key::I => Some(Command::SetTool(Tool::Pick)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_shortcuts_map_to_commands() {
        let ctrl = Modifiers::COMMAND;
        assert_eq!(shortcut_command(Key::Z, ctrl), Some(Command::Undo));
        assert_eq!(
            shortcut_command(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT),
            Some(Command::Redo)
        );
        assert_eq!(shortcut_command(Key::Y, ctrl), Some(Command::Redo));
        assert_eq!(shortcut_command(Key::O, ctrl), Some(Command::Open));
        assert_eq!(shortcut_command(Key::S, ctrl), Some(Command::Save));
        assert_eq!(shortcut_command(Key::A, ctrl), Some(Command::SelectAll));
    }

    #[test]
    fn bare_letters_select_tools() {
        let none = Modifiers::NONE;
        assert_eq!(shortcut_command(Key::B, none), Some(Command::SetTool(Tool::Brush)));
        assert_eq!(shortcut_command(Key::E, none), Some(Command::SetTool(Tool::Eraser)));
        assert_eq!(shortcut_command(Key::I, none), Some(Command::SetTool(Tool::Pick)));
        assert_eq!(shortcut_command(Key::A, none), Some(Command::SetTool(Tool::Airbrush)));
    }

    #[test]
    fn digits_set_brush_size_and_zero_resets_zoom() {
        let none = Modifiers::NONE;
        assert_eq!(shortcut_command(Key::Num5, none), Some(Command::SetBrushSize(5)));
        assert_eq!(shortcut_command(Key::Num0, none), Some(Command::ZoomReset));
        assert_eq!(shortcut_command(Key::PlusEquals, none), Some(Command::ZoomIn));
        assert_eq!(shortcut_command(Key::Minus, none), Some(Command::ZoomOut));
    }

    #[test]
    fn modified_letters_without_command_are_unbound() {
        assert_eq!(shortcut_command(Key::B, Modifiers::SHIFT), None);
        assert_eq!(shortcut_command(Key::Q, Modifiers::NONE), None);
    }
}
