//! Title normalization and similarity scoring for import matching.
//!
//! Catalog titles and LaunchBox titles rarely agree byte-for-byte
//! ("SIMCITY 2000" vs "SimCity 2000", "Dune II - The Building of a Dynasty"
//! vs "Dune II: The Building of a Dynasty"). Matching normalizes both sides
//! and scores in tiers: identical, identical after normalization, one title
//! containing the other, then plain edit distance.

/// Minimum similarity for a fuzzy candidate to count as a match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// A runner-up within this margin of the best score makes a match ambiguous.
pub const DEFAULT_AMBIGUITY_MARGIN: f64 = 0.05;

/// Normalize a title for matching: uppercase, drop `:`, map `-` to space,
/// collapse whitespace runs.
pub fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_space = false;

    for ch in title.chars() {
        let ch = match ch {
            ':' => continue,
            '-' => ' ',
            c => c.to_ascii_uppercase(),
        };
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }

    out
}

/// Score how alike two titles are, in `0.0..=1.0`.
///
/// Identical strings score 1.0; equal after [`normalize_title`] scores 0.95;
/// one normalized title containing the other scores 0.80..0.95 by length
/// ratio; anything else scores by edit distance over the normalized forms,
/// decreasing monotonically as the titles diverge.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let na = normalize_title(a);
    let nb = normalize_title(b);
    if na == nb {
        return 0.95;
    }
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }

    let (len_a, len_b) = (na.chars().count(), nb.chars().count());
    let longer = len_a.max(len_b);

    if na.contains(&nb) || nb.contains(&na) {
        let shorter = len_a.min(len_b);
        return 0.80 + 0.15 * (shorter as f64 / longer as f64);
    }

    let distance = levenshtein(&na, &nb);
    1.0 - distance as f64 / longer as f64
}

/// Edit distance between two strings, by character.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (prev_diag + cost).min(row[j] + 1).min(row[j + 1] + 1);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}
