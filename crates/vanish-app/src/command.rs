use vanish_types::api::VanishPreset;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: send with the selected preset
    Say(String),
    Vanish(VanishPreset),
    Presets,
    Delete(String),
    List,
    Users,
    Json,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Say(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };

        match name {
            "vanish" | "v" => match VanishPreset::from_label(arg) {
                Some(preset) => Self::Vanish(preset),
                None => Self::Unknown(line.to_string()),
            },
            "presets" => Self::Presets,
            "delete" | "d" if !arg.is_empty() => Self::Delete(arg.to_string()),
            "list" | "ls" => Self::List,
            "users" => Self::Users,
            "json" => Self::Json,
            "help" => Self::Help,
            "quit" | "q" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}
