//! Turns spoken or typed number phrases into values.
//!
//! Speech recognition hears "seven" as often as "7", and sometimes "to" when
//! the child said "two". The table covers digits, the words up to twenty,
//! the round tens, and the common homophones.

/// Parses a number out of free-form input.
///
/// Tries, in order: the whole input as digits, the whole input as a number
/// word, then each word of the input, so "it is five" still lands on 5.
/// Returns `None` when nothing in the input looks like a number.
#[must_use]
pub fn parse_number(text: &str) -> Option<u32> {
    let clean = text.trim().to_lowercase();
    if let Ok(value) = clean.parse::<u32>() {
        return Some(value);
    }
    if let Some(value) = word_value(&clean) {
        return Some(value);
    }
    clean.split_whitespace().find_map(|word| {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        word.parse::<u32>().ok().or_else(|| word_value(word))
    })
}

fn word_value(word: &str) -> Option<u32> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" | "to" | "too" => 2,
        "three" => 3,
        "four" | "for" | "fore" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" | "ate" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}
