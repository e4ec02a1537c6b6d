//! Fuzzy answer matching for typed answers.

use serde::{Deserialize, Serialize};

/// Share of the longer answer that may be wrong.
const TOLERANCE_RATIO: f64 = 0.2;

/// Verdict for a typed answer, with the numbers behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerGrade {
    /// Whether the answer is accepted.
    pub is_correct: bool,
    /// Edit distance between the normalized answers.
    pub distance: usize,
    /// Largest distance that is still accepted.
    pub allowed_edits: usize,
    /// Normalized typed answer (for display).
    pub typed_normalized: String,
    /// Normalized expected answer (for display).
    pub expected_normalized: String,
}

/// Trim, lowercase and collapse whitespace runs to a single space.
pub fn normalize_answer(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein distance with unit cost for insertion, deletion and substitution.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Only the previous row of the table is needed.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Number of edits tolerated for answers whose longer side has `max_len` characters.
pub fn allowed_edits(max_len: usize) -> usize {
    ((max_len as f64 * TOLERANCE_RATIO).floor() as usize).max(1)
}

/// Grade a typed answer against the expected one.
pub fn grade_answer(typed: &str, expected: &str) -> AnswerGrade {
    let typed_normalized = normalize_answer(typed);
    let expected_normalized = normalize_answer(expected);

    let max_len = typed_normalized
        .chars()
        .count()
        .max(expected_normalized.chars().count());
    let allowed = allowed_edits(max_len);

    let (is_correct, distance) = if typed_normalized.is_empty() || expected_normalized.is_empty() {
        (false, levenshtein_distance(&typed_normalized, &expected_normalized))
    } else if typed_normalized == expected_normalized {
        (true, 0)
    } else {
        let distance = levenshtein_distance(&typed_normalized, &expected_normalized);
        (distance <= allowed, distance)
    };

    AnswerGrade {
        is_correct,
        distance,
        allowed_edits: allowed,
        typed_normalized,
        expected_normalized,
    }
}

/// Whether `user_input` is close enough to `correct_answer` to count as correct.
pub fn is_fuzzy_match(user_input: &str, correct_answer: &str) -> bool {
    grade_answer(user_input, correct_answer).is_correct
}
