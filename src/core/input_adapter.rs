use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};

/// Arrow-key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Discrete command decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Printable character (space advances the shape)
    Character(char),
    /// Arrow key
    Special(Direction),
    Quit,
}

/// Decode a Winit key event; releases and unmapped keys yield `None`
pub fn translate(event: &KeyEvent) -> Option<Command> {
    translate_key(event.state, event.physical_key, &event.logical_key)
}

/// Decode the parts of a key event that matter here
pub fn translate_key(state: ElementState, physical: PhysicalKey, logical: &Key) -> Option<Command> {
    if state != ElementState::Pressed {
        return None;
    }

    if let PhysicalKey::Code(code) = physical {
        if code == KeyCode::Escape {
            return Some(Command::Quit);
        }
        if let Some(direction) = keycode_to_direction(code) {
            return Some(Command::Special(direction));
        }
    }

    match logical {
        Key::Named(NamedKey::Space) => Some(Command::Character(' ')),
        Key::Character(text) => text.chars().next().map(Command::Character),
        _ => None,
    }
}

/// Map Winit KeyCode to an arrow direction
fn keycode_to_direction(keycode: KeyCode) -> Option<Direction> {
    match keycode {
        KeyCode::ArrowUp => Some(Direction::Up),
        KeyCode::ArrowDown => Some(Direction::Down),
        KeyCode::ArrowLeft => Some(Direction::Left),
        KeyCode::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}
