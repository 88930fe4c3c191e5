// Shared constants and word-shape helpers used by every other module in the
// solver core.

/// How many letters are in a puzzle word.
pub const WORD_SIZE: usize = 5;
/// How many turns the game allows.
pub const NUM_TURNS: usize = 6;
/// Number of letters in the english alphabet.
pub const ALPHABET_SIZE: usize = (('z' as usize) - ('a' as usize)) + 1;

/// Index of a word within one of the two corpora. Both corpora stay well
/// under 65536 entries, so a u16 keeps candidate sets and state keys compact.
pub type WordId = u16;

/// Cost of playing a guess, derived from word frequency (see freq.rs).
pub type Cost = f64;

/// Returns the number of times each letter of the alphabet occurs in the
/// argument, indexed by the letter's position in the alphabet.
pub fn count_letters(word: &str) -> [usize; ALPHABET_SIZE] {
    count_letters_bytes(word.as_bytes())
}

/// Byte-slice form of [`count_letters`]. The bytes must already satisfy
/// [`is_wordle_str_bytes`].
pub fn count_letters_bytes(word: &[u8]) -> [usize; ALPHABET_SIZE] {
    debug_assert!(is_wordle_str_bytes(word));
    let mut out = [0; ALPHABET_SIZE];
    for i in 0..WORD_SIZE {
        out[letter_idx(word[i])] += 1;
    }

    out
}

/// Returns the index of the given letter within the alphabet ('a' = 0, 'b' = 1, ...)
pub fn letter_idx(letter: u8) -> usize {
    ((letter as isize) - ('a' as isize)) as usize
}

/// Checks whether the passed string is a legal puzzle word shape:
/// exactly 5 letters, all lowercase ascii.
pub fn is_wordle_str(v: &str) -> bool {
    is_wordle_str_bytes(v.as_bytes())
}

/// Checks whether the passed bytes represent an ASCII sequence which is also a
/// legal puzzle word shape.
pub fn is_wordle_str_bytes(v: &[u8]) -> bool {
    v.len() == WORD_SIZE && v.iter().all(is_normal_wordle_char)
}

/// Given some input &str, clean it up such that it might be a legal puzzle
/// word: trims surrounding space and lowercases. Does not trim length or strip
/// non-alpha characters, so the output must still pass [`is_wordle_str`].
pub fn normalize_wordle_word(str: &str) -> String {
    str.trim().to_lowercase()
}

/// Verifies that a byte represents a lowercase alphabetic character.
pub fn is_normal_wordle_char(v: &u8) -> bool {
    v.is_ascii_lowercase()
}
