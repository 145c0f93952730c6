use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Host command that focuses the search box.
pub const FOCUS_COMMAND_NAME: &str = "cmdSearchFocus";
pub const FOCUS_OPERATION: &str = "focus";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey needs at least one modifier and a key")]
    MissingModifier,
    #[error("unsupported modifier '{0}', use Ctrl, Alt or Shift")]
    UnsupportedModifier(String),
    #[error("unsupported key '{0}', use A-Z, 0-9, Space or F1-F24")]
    InvalidKey(String),
    #[error("{chord} is already bound to '{command}'")]
    Taken { chord: String, command: String },
    #[error("host refused binding: {0}")]
    Host(String),
}

/// Declaration order is the canonical order in a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
}

impl Modifier {
    fn parse(raw: &str) -> Result<Self, HotkeyError> {
        match raw.to_ascii_lowercase().as_str() {
            "ctrl" | "ctl" | "control" => Ok(Self::Ctrl),
            "alt" => Ok(Self::Alt),
            "shift" => Ok(Self::Shift),
            _ => Err(HotkeyError::UnsupportedModifier(raw.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
        }
    }
}

/// A key plus its modifiers, e.g. `Ctrl+Alt+Space`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Chord {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl Chord {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Spaced form shown next to the command in host hotkey editors.
    pub fn annotation(&self) -> String {
        self.parts().join(" + ")
    }

    fn parts(&self) -> Vec<&str> {
        self.modifiers
            .iter()
            .map(|m| m.as_str())
            .chain(std::iter::once(self.key.as_str()))
            .collect()
    }
}

impl FromStr for Chord {
    type Err = HotkeyError;

    /// Accepts modifiers in any order and case; duplicates collapse.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = input
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let key = parts.pop().ok_or(HotkeyError::MissingModifier)?;
        if parts.is_empty() {
            return Err(HotkeyError::MissingModifier);
        }

        let mut modifiers = parts
            .into_iter()
            .map(Modifier::parse)
            .collect::<Result<Vec<_>, _>>()?;
        modifiers.sort();
        modifiers.dedup();

        Ok(Self {
            modifiers,
            key: parse_key(key)?,
        })
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts().join("+"))
    }
}

fn parse_key(raw: &str) -> Result<String, HotkeyError> {
    let upper = raw.to_ascii_uppercase();
    if upper == "SPACE" {
        return Ok("Space".to_string());
    }
    if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
        return if (1..=24).contains(&n) {
            Ok(format!("F{n}"))
        } else {
            Err(HotkeyError::InvalidKey(raw.to_string()))
        };
    }
    match upper.as_bytes() {
        [c] if c.is_ascii_alphanumeric() => Ok(upper),
        _ => Err(HotkeyError::InvalidKey(raw.to_string())),
    }
}

/// Canonical `Ctrl+Alt+Shift+Key` spelling of `input`.
pub fn canonicalize(input: &str) -> Result<String, HotkeyError> {
    Ok(input.parse::<Chord>()?.to_string())
}

/// What the host needs to register the focus hotkey: a named command that
/// runs [`FOCUS_OPERATION`] and the chord that triggers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusBinding {
    pub command: String,
    pub annotation: String,
    pub chord: Chord,
    pub operation: String,
}

impl FocusBinding {
    pub fn new(chord: Chord) -> Self {
        Self {
            command: FOCUS_COMMAND_NAME.to_string(),
            annotation: chord.annotation(),
            chord,
            operation: FOCUS_OPERATION.to_string(),
        }
    }
}

/// Host hotkey table.
pub trait HotkeyHost {
    /// Name of the command currently bound to `chord`, if any.
    fn bound_command(&self, chord: &Chord) -> Option<String>;
    fn bind(&mut self, binding: &FocusBinding) -> Result<(), HotkeyError>;
}

/// Binds the focus command unless the chord already belongs to another
/// command. Rebinding our own command is allowed.
pub fn register_focus_binding(
    host: &mut dyn HotkeyHost,
    binding: &FocusBinding,
) -> Result<(), HotkeyError> {
    if let Some(command) = host.bound_command(&binding.chord) {
        if command != binding.command {
            tracing::warn!(chord = %binding.chord, %command, "focus hotkey not installed");
            return Err(HotkeyError::Taken {
                chord: binding.chord.to_string(),
                command,
            });
        }
    }

    host.bind(binding)?;
    tracing::info!(chord = %binding.chord, command = %binding.command, "focus hotkey installed");
    Ok(())
}
