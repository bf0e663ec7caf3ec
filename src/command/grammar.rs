use tracing::debug;

use super::Command;

/// Spellings the recognizer produces for the wake word
pub const WAKE_WORDS: [&str; 5] = ["ivok", "evok", "evoke", "evoked", "ebook"];

/// Homophones of "run" the recognizer tends to produce
const RUN_WORDS: [&str; 3] = ["run", "ran", "ren"];

/// A command form: returns the command when the body matches
type Rule = fn(&str) -> Option<Command>;

/// Command forms, tried in order after the wake word is stripped
const RULES: [(&str, Rule); 8] = [
    ("create project", create_project),
    ("create file", create_file),
    ("edit", edit),
    ("quit", quit),
    ("run", run),
    ("open", open_file),
    ("save", save),
    ("log out", log_out),
];

/// Whether the utterance starts with a wake word
///
/// Compared on the lowercased text with everything but ASCII letters
/// removed, so "Evoke, save" and "e-book save" both pass.
pub fn has_wake_word(text: &str) -> bool {
    let letters: String = text
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    WAKE_WORDS.iter().any(|word| letters.starts_with(word))
}

/// Remove the leading wake word and its separator, keeping the body's case
///
/// The wake word must be followed by at least one space or comma. Returns
/// `None` when the text does not start with a wake word in that form.
pub fn strip_wake_word(text: &str) -> Option<&str> {
    let text = text.trim_start();
    WAKE_WORDS.iter().find_map(|word| {
        let rest = strip_prefix_ignore_case(text, word)?;
        let body = rest.trim_start_matches([' ', ',']);
        (body.len() < rest.len()).then(|| body.trim_end())
    })
}

/// Parse an authenticated-mode utterance into a command
///
/// Anything without a wake word, or with a body matching no command form,
/// is [`Command::Unrecognized`].
pub fn parse_command(text: &str) -> Command {
    if !has_wake_word(text) {
        return Command::Unrecognized;
    }
    let Some(body) = strip_wake_word(text) else {
        debug!(text, "wake word not followed by a command");
        return Command::Unrecognized;
    };

    for (name, rule) in RULES {
        if let Some(command) = rule(body) {
            debug!(rule = name, ?command, "command matched");
            return command;
        }
    }

    debug!(body, "no command form matched");
    Command::Unrecognized
}

fn create_project(body: &str) -> Option<Command> {
    let name = strip_prefix_ignore_case(body, "create project ")?.trim();
    (!name.is_empty()).then(|| Command::CreateProject(name.to_owned()))
}

fn create_file(body: &str) -> Option<Command> {
    let path = strip_prefix_ignore_case(body, "create file ")?.trim();
    (!path.is_empty()).then(|| Command::CreateFile(clean_file_path(path)))
}

fn edit(body: &str) -> Option<Command> {
    exact(body, "edit").then_some(Command::EnterEdit)
}

fn quit(body: &str) -> Option<Command> {
    exact(body, "quit").then_some(Command::ExitEdit)
}

fn run(body: &str) -> Option<Command> {
    RUN_WORDS
        .iter()
        .any(|word| exact(body, word))
        .then_some(Command::RunCode)
}

fn save(body: &str) -> Option<Command> {
    exact(body, "save").then_some(Command::SaveCurrentFile)
}

fn log_out(body: &str) -> Option<Command> {
    exact(body, "log out").then_some(Command::LogOut)
}

fn open_file(body: &str) -> Option<Command> {
    let query = strip_prefix_ignore_case(body, "open ")?;
    let query = clean_open_query(query);
    (!query.is_empty()).then_some(Command::OpenFile(query))
}

/// " dot" becomes "." everywhere, then the first space becomes "_"
fn clean_file_path(path: &str) -> String {
    let mut cleaned = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(index) = find_ignore_case(rest, " dot") {
        cleaned.push_str(&rest[..index]);
        cleaned.push('.');
        rest = &rest[index + " dot".len()..];
    }
    cleaned.push_str(rest);
    cleaned.replacen(' ', "_", 1)
}

/// Drop all whitespace and fix a trailing "pay"/"pai" to "py"
fn clean_open_query(query: &str) -> String {
    let mut query: String = query.chars().filter(|c| !c.is_whitespace()).collect();
    for typo in ["pay", "pai"] {
        if let Some(stem) = strip_suffix_ignore_case(&query, typo) {
            query = format!("{stem}py");
            break;
        }
    }
    query
}

fn exact(body: &str, phrase: &str) -> bool {
    body.trim().eq_ignore_ascii_case(phrase)
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let start = text.len().checked_sub(suffix.len())?;
    let tail = text.get(start..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..start])
}

fn find_ignore_case(text: &str, needle: &str) -> Option<usize> {
    text.char_indices()
        .map(|(index, _)| index)
        .find(|&index| {
            text.get(index..index + needle.len())
                .is_some_and(|window| window.eq_ignore_ascii_case(needle))
        })
}
