use super::EditOperation;

/// Spoken cue -> literal text, applied token-wise in table order
///
/// Multi-word cues come first so they win over their single-word suffixes.
const SUBSTITUTIONS: &[(&[&str], &str)] = &[
    (&["single", "quote"], "'"),
    (&["p1"], "("),
    (&["p2"], ")"),
    (&["b1"], "{"),
    (&["b2"], "}"),
    (&["c1"], "["),
    (&["c2"], "]"),
    (&["dot"], "."),
    (&["semicolon"], ";"),
    (&["colon"], ":"),
    (&["column"], ":"),
    (&["quote"], "\""),
    (&["indent"], "\t"),
    (&["line"], "\n"),
    (&["definition"], "def"),
    (&["score"], "_"),
];

/// Rewrite a dictated phrase into the literal text to insert
///
/// The phrase is lowercased and split on whitespace; each token (or run of
/// tokens for multi-word cues) matching a spoken cue is replaced, and the
/// result is rejoined with single spaces. A trailing space is appended
/// unless the text ends in a newline or tab, so consecutive phrases stay
/// separated. An empty phrase yields an empty string.
pub fn normalize_dictation(phrase: &str) -> String {
    let lowered = phrase.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let rest = &tokens[i..];
        if let Some((cue, literal)) = SUBSTITUTIONS
            .iter()
            .find(|(cue, _)| rest.starts_with(cue))
        {
            out.push(*literal);
            i += cue.len();
        } else {
            out.push(tokens[i]);
            i += 1;
        }
    }

    let mut text = out.join(" ");
    if !text.is_empty() && !(text.ends_with('\n') || text.ends_with('\t')) {
        text.push(' ');
    }
    text
}

/// Normalize a phrase and wrap it as an insertion, or `None` if nothing is left
pub fn dictate(phrase: &str) -> Option<EditOperation> {
    let text = normalize_dictation(phrase);
    (!text.is_empty()).then_some(EditOperation::InsertText(text))
}
