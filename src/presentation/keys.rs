//! Translates egui key events into the key values used by the binding table.

use eframe::egui::{Key, Modifiers};

/// Key value for a pressed key, or `None` for keys the remote ignores.
/// Shifted letters produce a different value and stay unbound.
pub fn key_value(key: Key, modifiers: Modifiers) -> Option<&'static str> {
    let value = match key {
        Key::ArrowUp => "ArrowUp",
        Key::ArrowDown => "ArrowDown",
        Key::ArrowLeft => "ArrowLeft",
        Key::ArrowRight => "ArrowRight",
        Key::Enter => "Enter",
        Key::Escape => "Escape",
        Key::Home => "Home",
        Key::M | Key::V | Key::C | Key::U | Key::P if modifiers.shift => return None,
        Key::M => "m",
        Key::V => "v",
        Key::C => "c",
        Key::U => "u",
        Key::P => "p",
        _ => return None,
    };
    Some(value)
}
