use super::{Command, FieldKind};

/// Phrases recognized on the authentication form, no wake word needed
const AUTH_PHRASES: [(&str, Command); 8] = [
    ("login", Command::SelectField(FieldKind::Login)),
    ("password", Command::SelectField(FieldKind::Password)),
    ("create account", Command::SwitchAuthMode(false)),
    ("create mode", Command::SwitchAuthMode(false)),
    ("back to login", Command::SwitchAuthMode(true)),
    ("login mode", Command::SwitchAuthMode(true)),
    ("submit", Command::SubmitAuthForm),
    ("log in", Command::SubmitAuthForm),
];

/// Match an utterance against the authentication-form phrases
///
/// `normalized` is the trimmed, lowercased utterance. Returns `None` when
/// no phrase matches exactly.
pub fn parse_auth_phrase(normalized: &str) -> Option<Command> {
    AUTH_PHRASES
        .iter()
        .find(|(phrase, _)| *phrase == normalized)
        .map(|(_, command)| command.clone())
}

/// Turn a spoken login into a user name
///
/// Keeps only ASCII letters, digits and dots, lowercases, then folds the
/// spoken word "dot" into ".": `"John dot Doe"` becomes `"john.doe"`.
pub fn clean_login(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect::<String>()
        .to_lowercase()
        .replace("dot", ".")
}
