use crate::models::{FulfillmentProgress, LineItem, Part};

#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    ExactMatch(LineItem),
    SubstitutionCandidate { line: LineItem, scanned: Part },
    NoOpenLines,
}

// Reconcile a resolved part against the order lines. First open line for the
// same part wins; otherwise the first open line of any part becomes a
// substitution candidate; otherwise there is nothing left to fulfill.
// Ordering is strictly the sequence order of `lines`.
pub fn match_scanned(scanned: &Part, lines: &[LineItem]) -> MatchResult {
    if let Some(line) = lines
        .iter()
        .find(|line| line.part == scanned.pk && line.remaining() > 0.0)
    {
        return MatchResult::ExactMatch(line.clone());
    }

    if let Some(line) = lines.iter().find(|line| line.remaining() > 0.0) {
        return MatchResult::SubstitutionCandidate {
            line: line.clone(),
            scanned: scanned.clone(),
        };
    }

    MatchResult::NoOpenLines
}

// Aggregate progress over a line collection. Per-line contributions are
// clamped into [0, quantity] so the 0 <= completed <= total invariant holds
// even for snapshots the server would reject.
pub fn progress(lines: &[LineItem]) -> FulfillmentProgress {
    let mut completed = 0.0;
    let mut total = 0.0;
    for line in lines {
        let quantity = line.quantity.max(0.0);
        total += quantity;
        completed += line.shipped.clamp(0.0, quantity);
    }
    FulfillmentProgress { completed, total }
}
