//! Remote Command Tokens
//!
//! The fixed set of text tokens sent to the receiver, and the static tables
//! binding on-screen controls and key presses to them.

use std::fmt;

/// A single remote-control action, transmitted as its literal token text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCommand {
    Up,
    Down,
    Left,
    Right,
    Ok,
    Back,
    Home,
    Menu,
    VolumeUp,
    VolumeDown,
    Mute,
    PowerOff,
}

impl RemoteCommand {
    /// Every token the receiver understands
    pub const ALL: [RemoteCommand; 12] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Ok,
        Self::Back,
        Self::Home,
        Self::Menu,
        Self::VolumeUp,
        Self::VolumeDown,
        Self::Mute,
        Self::PowerOff,
    ];

    /// The token as it goes over the air
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Ok => "OK",
            Self::Back => "BACK",
            Self::Home => "HOME",
            Self::Menu => "MENU",
            Self::VolumeUp => "VOL_UP",
            Self::VolumeDown => "VOL_DOWN",
            Self::Mute => "MUTE",
            Self::PowerOff => "POWER_OFF",
        }
    }

    /// Raw payload: UTF-8 bytes of the token, no framing
    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-screen control name -> token
pub const CONTROL_BINDINGS: &[(&str, RemoteCommand)] = &[
    ("power", RemoteCommand::PowerOff),
    ("up", RemoteCommand::Up),
    ("down", RemoteCommand::Down),
    ("left", RemoteCommand::Left),
    ("right", RemoteCommand::Right),
    ("ok", RemoteCommand::Ok),
    ("home", RemoteCommand::Home),
    ("back", RemoteCommand::Back),
    ("menu", RemoteCommand::Menu),
    ("volup", RemoteCommand::VolumeUp),
    ("voldown", RemoteCommand::VolumeDown),
    ("mute", RemoteCommand::Mute),
];

/// Key value -> token. Letters are matched case-sensitively.
pub const KEY_BINDINGS: &[(&str, RemoteCommand)] = &[
    ("ArrowUp", RemoteCommand::Up),
    ("ArrowDown", RemoteCommand::Down),
    ("ArrowLeft", RemoteCommand::Left),
    ("ArrowRight", RemoteCommand::Right),
    ("Enter", RemoteCommand::Ok),
    ("Escape", RemoteCommand::Back),
    ("Home", RemoteCommand::Home),
    ("m", RemoteCommand::Menu),
    ("v", RemoteCommand::VolumeUp),
    ("c", RemoteCommand::VolumeDown),
    ("u", RemoteCommand::Mute),
    ("p", RemoteCommand::PowerOff),
];

pub fn command_for_control(control: &str) -> Option<RemoteCommand> {
    lookup(CONTROL_BINDINGS, control)
}

pub fn command_for_key(key: &str) -> Option<RemoteCommand> {
    lookup(KEY_BINDINGS, key)
}

fn lookup(table: &[(&str, RemoteCommand)], name: &str) -> Option<RemoteCommand> {
    table
        .iter()
        .find(|(bound, _)| *bound == name)
        .map(|(_, command)| *command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_bindings() {
        assert_eq!(command_for_control("voldown"), Some(RemoteCommand::VolumeDown));
        assert_eq!(command_for_control("power"), Some(RemoteCommand::PowerOff));
        assert_eq!(command_for_control("ok"), Some(RemoteCommand::Ok));
        assert_eq!(command_for_control("missing"), None);
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key("ArrowUp"), Some(RemoteCommand::Up));
        assert_eq!(command_for_key("Escape"), Some(RemoteCommand::Back));
        assert_eq!(command_for_key("m"), Some(RemoteCommand::Menu));
        assert_eq!(command_for_key("c"), Some(RemoteCommand::VolumeDown));
        assert_eq!(command_for_key("M"), None);
        assert_eq!(command_for_key("x"), None);
    }

    #[test]
    fn test_token_bytes() {
        assert_eq!(RemoteCommand::VolumeDown.as_bytes(), b"VOL_DOWN");
        assert_eq!(RemoteCommand::PowerOff.as_bytes(), b"POWER_OFF");
        assert_eq!(RemoteCommand::Up.to_string(), "UP");
    }

    #[test]
    fn test_every_token_is_bound_both_ways() {
        for command in RemoteCommand::ALL {
            assert!(CONTROL_BINDINGS.iter().any(|(_, c)| *c == command));
            assert!(KEY_BINDINGS.iter().any(|(_, c)| *c == command));
        }
        assert_eq!(CONTROL_BINDINGS.len(), 12);
        assert_eq!(KEY_BINDINGS.len(), 12);
    }
}
