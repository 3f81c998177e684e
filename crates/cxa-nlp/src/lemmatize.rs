//! Rule-based English lemmatizer.
//!
//! An exception table covers irregular forms; regular plurals and `-ed` /
//! `-ing` forms are reduced with suffix rules in the style of Porter's step
//! 1, with the removed `e` restored where the stem needs it
//! (`updated` → `update`, `making` → `make`).

use std::collections::{HashMap, HashSet};

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("got", "get"),
    ("gotten", "get"),
    ("paid", "pay"),
    ("sent", "send"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("came", "come"),
    ("saw", "see"),
    ("seen", "see"),
    ("said", "say"),
    ("told", "tell"),
    ("thought", "think"),
    ("bought", "buy"),
    ("found", "find"),
    ("kept", "keep"),
    ("left", "leave"),
    ("lost", "lose"),
    ("felt", "feel"),
    ("knew", "know"),
    ("known", "know"),
    ("began", "begin"),
    ("begun", "begin"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("added", "add"),
    ("created", "create"),
    ("creating", "create"),
    ("used", "use"),
    ("using", "use"),
];

/// Words that look inflected but are already lemmas.
const INVARIANT: &[&str] = &[
    "always",
    "banking",
    "ceiling",
    "evening",
    "morning",
    "news",
    "perhaps",
    "series",
    "sometimes",
];

/// Stem endings that take a trailing `e` once `-ed` / `-ing` is removed.
const E_RESTORING_ENDINGS: &[&str] = &[
    "bl", "iz", "iv", "rv", "lv", "ov", "rg", "dg", "nc", "rc", "ag", "ang",
];

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Lemmatizer {
    #[must_use]
    pub fn english() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
            invariant: INVARIANT.iter().copied().collect(),
        }
    }

    /// Lemma of a lowercase alphabetic word.
    #[must_use]
    pub fn lemma(&self, word: &str) -> String {
        if let Some(lemma) = self.irregular.get(word) {
            return (*lemma).to_owned();
        }
        if self.invariant.contains(word) {
            return word.to_owned();
        }

        let len = word.chars().count();

        if let Some(stem) = word.strip_suffix("ies").filter(|s| s.chars().count() >= 2) {
            return format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("ied").filter(|s| s.chars().count() >= 2) {
            return format!("{stem}y");
        }
        if word.ends_with("sses")
            || word.ends_with("ches")
            || word.ends_with("shes")
            || word.ends_with("xes")
            || word.ends_with("zes")
        {
            return word[..word.len() - 2].to_owned();
        }
        if len > 3
            && word.ends_with('s')
            && !word.ends_with("ss")
            && !word.ends_with("us")
            && !word.ends_with("is")
        {
            return word[..word.len() - 1].to_owned();
        }
        if word.ends_with("eed") {
            return word.to_owned();
        }
        if len > 4 {
            if let Some(stem) = word.strip_suffix("ed").filter(|s| has_vowel(s)) {
                return restore_stem(stem);
            }
        }
        if len > 5 {
            if let Some(stem) = word
                .strip_suffix("ing")
                .filter(|s| has_vowel(s) && s.chars().count() >= 3)
            {
                return restore_stem(stem);
            }
        }

        word.to_owned()
    }
}

/// Repair a stem left after removing `-ed` or `-ing`.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();

    if n >= 2
        && chars[n - 1] == chars[n - 2]
        && is_consonant(&chars, n - 1)
        && !matches!(chars[n - 1], 'l' | 's' | 'z')
    {
        return chars[..n - 1].iter().collect();
    }

    let at_after_consonant = n >= 3 && stem.ends_with("at") && is_consonant(&chars, n - 3);
    if at_after_consonant || E_RESTORING_ENDINGS.iter().any(|e| stem.ends_with(e)) {
        return format!("{stem}e");
    }

    if measure(&chars) == 1 && ends_cvc(&chars) {
        return format!("{stem}e");
    }

    stem.to_owned()
}

fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
}

/// `y` counts as a consonant at the start of a word or after a vowel.
fn is_consonant(chars: &[char], i: usize) -> bool {
    match chars[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(chars, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences, `m` in `[C](VC)^m[V]`.
fn measure(chars: &[char]) -> usize {
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..chars.len() {
        let consonant = is_consonant(chars, i);
        if consonant && prev_vowel {
            m += 1;
        }
        prev_vowel = !consonant;
    }
    m
}

/// Consonant-vowel-consonant ending whose final letter is not `w`, `x`, or `y`.
fn ends_cvc(chars: &[char]) -> bool {
    let n = chars.len();
    n >= 3
        && is_consonant(chars, n - 3)
        && !is_consonant(chars, n - 2)
        && is_consonant(chars, n - 1)
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
}
