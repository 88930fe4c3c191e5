/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use self::Coloring::*;
use super::prelude::*;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

///
/// Any set of colorings can be converted to a "code" which uniquely identifies
/// that specific coloring. This type is the number we use to store that code
/// (and we pick u8 because the range is 0 -> 3^5=243 for 3 colorings in a
/// 5 letter puzzle).
///
pub type PatternCode = u8;

/// The code produced when every square is Correct (the winning pattern).
pub const ALL_CORRECT_CODE: PatternCode = 242;

///
/// The three different colors that a puzzle square can be...
///   * Absent = the letter is not in the answer (also indicates no further
///              instances of a letter when another square with the same letter
///              is colored misplaced/correct)
///   * Misplaced = the letter is in the answer, but not in this position
///   * Correct = the letter is in the answer at this position
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coloring {
    Absent,
    Misplaced,
    Correct,
}

impl Coloring {
    /// All three colorings (make sure this actually matches the definition above)
    pub const ALL: [Coloring; 3] = [Absent, Misplaced, Correct];
    /// The number of possible colorings
    pub const NUM: usize = Self::ALL.len();

    /// Converts the coloring to a ternary digit (0, 1, or 2)
    pub fn ordinal(&self) -> PatternCode {
        match self {
            Absent => 0,
            Misplaced => 1,
            Correct => 2,
        }
    }

    /// Converts a ternary digit (usually from .ordinal()) back to a Coloring
    pub fn from_ordinal(digit: PatternCode) -> Option<Self> {
        Some(match digit {
            0 => Absent,
            1 => Misplaced,
            2 => Correct,
            _ => return None,
        })
    }

    /// Gives the best emoji to represent the coloring (used for debug printing)
    pub fn emoji(&self) -> &'static str {
        match self {
            Absent => "⬛",
            Misplaced => "🟨",
            Correct => "🟩",
        }
    }
}

/// An array of Colorings, one for each square in the puzzle.
pub type ColoringsArray = [Coloring; WORD_SIZE];

/// The array of Colorings, but in a struct, so that we can attach some useful
/// functions to a complete set of Colorings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Colorings(pub ColoringsArray);

impl From<ColoringsArray> for Colorings {
    fn from(arr: ColoringsArray) -> Self {
        Self(arr)
    }
}

/// Delegate indexing of the struct to it's inner value
impl Index<usize> for Colorings {
    type Output = Coloring;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Delegate mutable indexing of the struct to it's inner value
impl IndexMut<usize> for Colorings {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Colorings {
    /// How many different possible colorings are there? In the case of a
    /// 5 letter puzzle with 3 colorings it's 3^5=243.
    pub const NUM_STATES: usize = Coloring::NUM.pow(WORD_SIZE as u32);

    ///
    /// Compute what colors would be shown given some guess & answer. For
    /// example if the guess was "tares" and the answer was "scare" we should
    /// compute [Absent, Misplaced, Misplaced, Misplaced, Misplaced].
    ///
    /// This is implemented by:
    /// * creating an empty [Coloring; WORD_SIZE] where all colors default to Absent
    /// * computing a "budget" for each letter in the alphabet (based on their count in the answer)
    /// * performing a "GREEN pass" which marks all correctly positioned letters (and updates the budget)
    /// * performing a "YELLOW pass" to mark all misplaced letters (based on the remaining budget for each letter)
    ///
    /// The budget handling is what makes repeated letters come out right: a
    /// second occurrence of a letter in the guess only goes yellow while the
    /// answer still has unconsumed occurrences of it.
    ///
    pub fn with_guess_answer(guess: &str, answer: &str) -> Self {
        assert!(is_wordle_str(answer));
        assert!(is_wordle_str(guess));

        let mut out = Self::default();
        let mut answer_letter_counts = count_letters(answer);
        let answer_bytes = answer.as_bytes();
        let guess_bytes = guess.as_bytes();

        // GREEN pass
        for i in 0..WORD_SIZE {
            let gc = guess_bytes[i];
            let ac = answer_bytes[i];

            if gc == ac {
                answer_letter_counts[letter_idx(gc)] -= 1;
                out[i] = Correct;
            }
        }

        // YELLOW pass
        for i in 0..WORD_SIZE {
            if out[i] != Correct {
                let gc = guess_bytes[i];
                let counter = &mut answer_letter_counts[letter_idx(gc)];
                if *counter > 0 {
                    *counter -= 1;
                    out[i] = Misplaced;
                }
            }
        }

        out
    }

    ///
    /// Computes a code that uniquely identifies this particular coloring.
    /// These codes are numbers in [0, 243).
    ///
    /// We treat the colorings as a 5 digit base-3 number where the LEFT-most
    /// square is the most significant digit: code = sum of d_i * 3^(4-i).
    /// The all-Correct coloring therefore encodes to 242.
    ///
    /// This is useful because the selector and the search driver want one
    /// bucket for each possible coloring, and with to_code() a coloring is an
    /// array index into a flat 243-slot table. No hashing, no heap.
    ///
    pub fn to_code(&self) -> PatternCode {
        let mut out = 0;
        for i in 0..WORD_SIZE {
            out = out * (Coloring::NUM as PatternCode) + self[i].ordinal();
        }
        out
    }

    ///
    /// Converts a PatternCode back to Colorings, peeling base-3 digits from
    /// least significant (right-most square) to most significant.
    ///
    pub fn from_code(mut code: PatternCode) -> Option<Self> {
        if code as usize >= Self::NUM_STATES {
            return None;
        }

        let mut out = Self::default();
        for i in (0..WORD_SIZE).rev() {
            out[i] = Coloring::from_ordinal(code % (Coloring::NUM as u8))?;
            code /= Coloring::NUM as u8;
        }

        Some(out)
    }

    /// Builds Colorings from the raw 0/1/2 digit vector a game controller
    /// reports, left-most square first. None if any digit is out of range.
    pub fn from_digits(digits: &[u8; WORD_SIZE]) -> Option<Self> {
        let mut out = Self::default();
        for i in 0..WORD_SIZE {
            out[i] = Coloring::from_ordinal(digits[i])?;
        }
        Some(out)
    }

    /// The raw 0/1/2 digit vector, left-most square first.
    pub fn digits(&self) -> [u8; WORD_SIZE] {
        let mut out = [0; WORD_SIZE];
        for i in 0..WORD_SIZE {
            out[i] = self[i].ordinal();
        }
        out
    }
}

impl Default for Colorings {
    fn default() -> Self {
        Self([Absent; WORD_SIZE])
    }
}

impl Display for Colorings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..WORD_SIZE {
            f.write_str(self[i].emoji())?;
        }

        Ok(())
    }
}

///
/// The pattern oracle: the code shown for a given (guess, answer) pair.
///
/// Pure and total over 5-letter lowercase inputs; pattern_code(w, w) is always
/// [`ALL_CORRECT_CODE`]. The precomputed matrix (matrix.rs) must agree with
/// this function on every cell.
///
pub fn pattern_code(guess: &str, answer: &str) -> PatternCode {
    Colorings::with_guess_answer(guess, answer).to_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    /// Every representable code, decoded. Exhausts all 243 colorings.
    fn iter_all_possible() -> impl Iterator<Item = Colorings> {
        (0..Colorings::NUM_STATES as u16).map(|code| {
            Colorings::from_code(code as PatternCode).expect("codes below 243 must decode")
        })
    }

    #[test]
    fn test_coloring_ordinal_reversible() {
        for c in Coloring::ALL {
            assert_eq!(Some(c), Coloring::from_ordinal(c.ordinal()))
        }
    }

    #[test]
    fn test_unique_coding_of_colorings() {
        let mut seen = [false; Colorings::NUM_STATES];
        for colorings in iter_all_possible() {
            let code = colorings.to_code();
            assert!(
                !seen[code as usize],
                "expected no duplicate codes, got duplicate {}",
                code
            );
            seen[code as usize] = true;
        }
    }

    #[test]
    fn test_reversible_coding_of_colorings() {
        for colorings in iter_all_possible() {
            let code = colorings.to_code();
            assert_eq!(
                Some(colorings),
                Colorings::from_code(code),
                "code {} should reverse to the colorings that produced it",
                code,
            )
        }
    }

    #[test]
    fn test_out_of_range_code_rejected() {
        assert_eq!(Colorings::from_code(243), None);
        assert_eq!(Colorings::from_code(255), None);
    }

    #[test]
    fn test_leftmost_square_is_most_significant() {
        let only_first_green = Colorings([Correct, Absent, Absent, Absent, Absent]);
        assert_eq!(only_first_green.to_code(), 162); // 2 * 3^4
        let only_last_green = Colorings([Absent, Absent, Absent, Absent, Correct]);
        assert_eq!(only_last_green.to_code(), 2);
    }

    #[test_case("apple", "paper", [Misplaced, Misplaced, Correct, Absent, Misplaced])]
    #[test_case("tares", "scare", [Absent, Misplaced, Misplaced, Misplaced, Misplaced])]
    #[test_case("spare", "scare", [Correct, Absent, Correct, Correct, Correct])]
    #[test_case("scare", "scare", [Correct, Correct, Correct, Correct, Correct])]
    #[test_case("drain", "apron", [Absent, Misplaced, Misplaced, Absent, Correct])]
    #[test_case("roman", "apron", [Misplaced, Misplaced, Absent, Misplaced, Correct])]
    #[test_case("lanes", "legal", [Correct, Misplaced, Absent, Misplaced, Absent])]
    #[test_case("lemma", "legal", [Correct, Correct, Absent, Absent, Misplaced])]
    #[test_case("arles", "ledge", [Absent, Absent, Misplaced, Misplaced, Absent])]
    #[test_case("elite", "ledge", [Misplaced, Misplaced, Absent, Absent, Correct])]
    #[test_case("fuzzy", "brick", [Absent, Absent, Absent, Absent, Absent])]
    fn test_coloring(guess: &str, answer: &str, expected_coloring: ColoringsArray) {
        assert_eq!(
            Colorings::with_guess_answer(guess, answer),
            Colorings(expected_coloring),
            "guess={}, answer={}",
            guess,
            answer
        );
    }

    // The literal codes fixed by the encoding: duplicates, exact match, all absent.
    #[test_case("apple", "paper", 127)]
    #[test_case("crane", "crane", ALL_CORRECT_CODE)]
    #[test_case("fuzzy", "brick", 0)]
    fn test_pattern_code(guess: &str, answer: &str, expected: PatternCode) {
        assert_eq!(pattern_code(guess, answer), expected);
    }

    #[test]
    fn test_self_match_is_all_correct() {
        for word in ["crane", "salet", "fuzzy", "abbey", "mamma"] {
            assert_eq!(pattern_code(word, word), ALL_CORRECT_CODE);
        }
    }

    #[test]
    fn test_digit_round_trip() {
        let c = Colorings([Misplaced, Misplaced, Correct, Misplaced, Absent]);
        assert_eq!(Colorings::from_digits(&c.digits()), Some(c));
        assert_eq!(Colorings::from_digits(&[0, 1, 2, 3, 0]), None);
    }
}
