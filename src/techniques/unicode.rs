// File: unicode.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Unicode normalization and homograph variants.
//!
//! String-based allowlists that compare before normalization disagree with
//! backends that normalize first; these variants probe that gap. The
//! decomposition table is a fixed Latin-1 subset rather than full UCD data:
//! the probe only ever mutates URL paths, not arbitrary text.

use crate::codec;

const ZWJ: char = '\u{200D}';
const ZWSP: char = '\u{200B}';
const ZWNJ: char = '\u{200C}';
const RLO: char = '\u{202E}';
const LRO: char = '\u{202D}';
const PDF: char = '\u{202C}';

/// Latin-1 precomposed letters and their base + combining-mark
/// decompositions.
const NFD_TABLE: &[(char, &str)] = &[
    ('À', "A\u{300}"),
    ('Á', "A\u{301}"),
    ('Â', "A\u{302}"),
    ('Ã', "A\u{303}"),
    ('Ä', "A\u{308}"),
    ('Å', "A\u{30A}"),
    ('Ç', "C\u{327}"),
    ('È', "E\u{300}"),
    ('É', "E\u{301}"),
    ('Ê', "E\u{302}"),
    ('Ë', "E\u{308}"),
    ('Ì', "I\u{300}"),
    ('Í', "I\u{301}"),
    ('Î', "I\u{302}"),
    ('Ï', "I\u{308}"),
    ('Ñ', "N\u{303}"),
    ('Ò', "O\u{300}"),
    ('Ó', "O\u{301}"),
    ('Ô', "O\u{302}"),
    ('Õ', "O\u{303}"),
    ('Ö', "O\u{308}"),
    ('Ù', "U\u{300}"),
    ('Ú', "U\u{301}"),
    ('Û', "U\u{302}"),
    ('Ü', "U\u{308}"),
    ('Ý', "Y\u{301}"),
    ('à', "a\u{300}"),
    ('á', "a\u{301}"),
    ('â', "a\u{302}"),
    ('ã', "a\u{303}"),
    ('ä', "a\u{308}"),
    ('å', "a\u{30A}"),
    ('ç', "c\u{327}"),
    ('è', "e\u{300}"),
    ('é', "e\u{301}"),
    ('ê', "e\u{302}"),
    ('ë', "e\u{308}"),
    ('ì', "i\u{300}"),
    ('í', "i\u{301}"),
    ('î', "i\u{302}"),
    ('ï', "i\u{308}"),
    ('ñ', "n\u{303}"),
    ('ò', "o\u{300}"),
    ('ó', "o\u{301}"),
    ('ô', "o\u{302}"),
    ('õ', "o\u{303}"),
    ('ö', "o\u{308}"),
    ('ù', "u\u{300}"),
    ('ú', "u\u{301}"),
    ('û', "u\u{302}"),
    ('ü', "u\u{308}"),
    ('ý', "y\u{301}"),
    ('ÿ', "y\u{308}"),
];

/// Visually confusable substitutions for ASCII letters and digits, drawn
/// from the Cyrillic, Greek and Latin-with-diacritics blocks. Math-bold
/// forms are covered wholesale by `math_bold` rather than per entry.
const HOMOGRAPH_TABLE: &[(char, &[char])] = &[
    ('A', &['А', 'Α', 'À']),
    ('B', &['В', 'Β']),
    ('C', &['С', 'Ç']),
    ('E', &['Е', 'Ε', 'É']),
    ('H', &['Н', 'Η']),
    ('I', &['І', 'Ι', 'Í']),
    ('J', &['Ј']),
    ('K', &['К', 'Κ']),
    ('M', &['М', 'Μ']),
    ('N', &['Ν', 'Ñ']),
    ('O', &['О', 'Ο', 'Ö']),
    ('P', &['Р', 'Ρ']),
    ('S', &['Ѕ', 'Ś']),
    ('T', &['Т', 'Τ']),
    ('X', &['Х', 'Χ']),
    ('Y', &['У', 'Υ', 'Ý']),
    ('Z', &['Ζ', 'Ź']),
    ('a', &['а', 'α', 'à']),
    ('c', &['с', 'ç']),
    ('d', &['ԁ']),
    ('e', &['е', 'é', 'è']),
    ('h', &['һ']),
    ('i', &['і', 'ı', 'í']),
    ('j', &['ј']),
    ('o', &['о', 'ο', 'ö']),
    ('p', &['р', 'ρ']),
    ('q', &['ԛ']),
    ('s', &['ѕ', 'ś']),
    ('u', &['υ', 'ü']),
    ('v', &['ν', 'ѵ']),
    ('w', &['ѡ', 'ԝ']),
    ('x', &['х', 'χ']),
    ('y', &['у', 'ý']),
    ('0', &['О', 'Ο']),
    ('1', &['ӏ']),
    ('3', &['З']),
    ('4', &['Ч']),
    ('6', &['б']),
];

fn nfd_decompose(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match NFD_TABLE.iter().find(|(pre, _)| *pre == c) {
            Some((_, decomposed)) => out.push_str(decomposed),
            None => out.push(c),
        }
    }
    out
}

fn insert_after_ascii_letters(input: &str, filler: char) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        out.push(c);
        if c.is_ascii_alphabetic() {
            out.push(filler);
        }
    }
    out
}

/// Normalization-gap variants, fixed order: the input itself, the NFD
/// decomposition (when it differs), zero-width insertions (ZWJ, ZWSP, ZWNJ
/// after each ASCII letter), and the two directional-override wraps.
pub fn normalization_variants(input: &str) -> Vec<String> {
    // Run the input through the strict decoder first: anything that is not
    // well-formed UTF-8 by our own rules is dropped codepoint-wise before
    // mutation, matching how the backends under test behave.
    let cleaned = codec::encode_utf8(&codec::decode_utf8(input.as_bytes()));

    let mut out = vec![cleaned.clone()];

    let decomposed = nfd_decompose(&cleaned);
    if decomposed != cleaned {
        out.push(decomposed);
    }

    out.push(insert_after_ascii_letters(&cleaned, ZWJ));
    out.push(insert_after_ascii_letters(&cleaned, ZWSP));
    out.push(insert_after_ascii_letters(&cleaned, ZWNJ));

    out.push(format!("{}{}{}", RLO, cleaned, PDF));
    out.push(format!("{}{}{}", LRO, cleaned, PDF));

    out
}

/// Homograph substitution variants.
///
/// For every table character present in the input, one variant per
/// replacement with all occurrences of that character swapped; then a mixed
/// variant using the first replacement of every mappable character, a
/// full-width variant, and a math-bold variant.
pub fn homograph_variants(input: &str) -> Vec<String> {
    let mut out = Vec::new();

    for (ascii, replacements) in HOMOGRAPH_TABLE {
        if !input.contains(*ascii) {
            continue;
        }
        for replacement in *replacements {
            out.push(input.replace(*ascii, &replacement.to_string()));
        }
    }

    let mixed: String = input
        .chars()
        .map(|c| {
            HOMOGRAPH_TABLE
                .iter()
                .find(|(ascii, _)| *ascii == c)
                .map(|(_, reps)| reps[0])
                .unwrap_or(c)
        })
        .collect();
    if mixed != input {
        out.push(mixed);
    }

    out.push(full_width(input));
    out.push(math_bold(input));

    out
}

/// ASCII `0x21..=0x7E` mapped onto the full-width block `U+FF01..=U+FF5E`.
pub fn full_width(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{21}'..='\u{7E}' => {
                char::from_u32(0xFF01 + (c as u32 - 0x21)).unwrap_or(c)
            }
            other => other,
        })
        .collect()
}

/// ASCII alphanumerics mapped onto the mathematical bold block.
pub fn math_bold(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let mapped = match c {
                'A'..='Z' => char::from_u32(0x1D400 + (c as u32 - 'A' as u32)),
                'a'..='z' => char::from_u32(0x1D41A + (c as u32 - 'a' as u32)),
                '0'..='9' => char::from_u32(0x1D7CE + (c as u32 - '0' as u32)),
                _ => None,
            };
            mapped.unwrap_or(c)
        })
        .collect()
}
