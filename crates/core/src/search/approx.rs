//! Approximate substring scoring.
//!
//! A pattern is aligned against every substring of the text with unit-cost
//! edits; the best alignment is scored as `errors / pattern_len` plus a
//! proximity penalty `|start - location| / distance`. Zero is an exact match at
//! the expected location.

/// One candidate alignment ending at a given text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Alignment {
    errors: usize,
    start: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreParams {
    pub location: usize,
    pub distance: usize,
}

pub fn score(pattern: &[char], text: &[char], params: ScoreParams) -> Option<f64> {
    let m = pattern.len();
    if m == 0 || text.is_empty() {
        return None;
    }

    alignments(pattern, text, params.location)
        .into_iter()
        .map(|a| compute_score(a, m, params))
        .min_by(|a, b| a.total_cmp(b))
}

fn compute_score(a: Alignment, pattern_len: usize, params: ScoreParams) -> f64 {
    let accuracy = a.errors as f64 / pattern_len as f64;
    let proximity = a.start.abs_diff(params.location);
    if params.distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }
    accuracy + proximity as f64 / params.distance as f64
}

// Semi-global edit distance: free prefix and suffix in the text, every pattern
// character must be accounted for. Each cell keeps every alignment of
// `pattern[..i]` ending at that text column that is not beaten on both errors
// and distance from `location`. Alignments with `pattern.len()` or more errors are dropped as they go.
fn alignments(pattern: &[char], text: &[char], location: usize) -> Vec<Alignment> {
    let m = pattern.len();
    let n = text.len();
    let mut prev: Vec<Vec<Alignment>> = (0..=n)
        .map(|j| vec![Alignment { errors: 0, start: j }])
        .collect();
    let mut cur: Vec<Vec<Alignment>> = vec![Vec::new(); n + 1];
    let mut candidates = Vec::new();

    for (i, &p) in pattern.iter().enumerate() {
        cur[0].clear();
        if i + 1 < m {
            cur[0].push(Alignment {
                errors: i + 1,
                start: 0,
            });
        }
        for j in 1..=n {
            let cost = usize::from(p != text[j - 1]);
            candidates.clear();
            candidates.extend(prev[j - 1].iter().map(|a| Alignment {
                errors: a.errors + cost,
                start: a.start,
            }));
            candidates.extend(prev[j].iter().chain(&cur[j - 1]).map(|a| Alignment {
                errors: a.errors + 1,
                start: a.start,
            }));
            let mut front = std::mem::take(&mut cur[j]);
            pareto_front(&mut candidates, m, location, &mut front);
            cur[j] = front;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev.into_iter().flatten().collect()
}

fn pareto_front(
    candidates: &mut [Alignment],
    max_errors: usize,
    location: usize,
    out: &mut Vec<Alignment>,
) {
    out.clear();
    candidates.sort_by_key(|a| (a.errors, a.start.abs_diff(location), a.start));
    for &a in candidates.iter().filter(|a| a.errors < max_errors) {
        let proximity = a.start.abs_diff(location);
        if out
            .last()
            .map_or(true, |best| proximity < best.start.abs_diff(location))
        {
            out.push(a);
        }
    }
}

/// Field-length norm: `1 / sqrt(tokens)`, rounded to three decimals, so a hit
/// in a short field outranks the same hit in a long one.
pub fn field_norm(value: &str) -> f64 {
    let tokens = value.split(' ').filter(|t| !t.is_empty()).count().max(1);
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}
