/// Spelled-out cardinals understood by the delete macro
const NUMBER_WORDS: [&str; 21] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
    "twenty",
];

/// Resolve a spelled-out number word ("zero" through "twenty")
///
/// Case-insensitive. Returns `None` for anything outside the table, so
/// callers can tell "not a number word" apart from `Some(0)`.
pub fn word_to_number(word: &str) -> Option<u32> {
    let word = word.trim().to_lowercase();
    NUMBER_WORDS
        .iter()
        .position(|candidate| *candidate == word)
        .and_then(|index| u32::try_from(index).ok())
}
