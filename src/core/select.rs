//! Selection engine: one file per `interval`-wide window.
//!
//! Targets run `first, first + interval, ...` up to the last position of
//! the ordered input. For each target the leading run of remaining files
//! below `target + interval` is ranked by distance to the target and the
//! best one is taken. Everything up to `max(picked, target)` is then
//! dropped from the front of the working sequence, so no window is ever
//! revisited.
//!
//! Ordering note: the default [`SortOrder::Lexicographic`] sorts by raw
//! filename, which disagrees with numeric order once digit counts differ
//! (`9.bmp` sorts after `10.bmp`). Zero-padded scans are unaffected; use
//! [`SortOrder::Numeric`] otherwise.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use crate::{
    core::{export::SelectionResult, slice::ParsedFile},
    error::{PickError, PickResult},
};

/// How the input is ordered before the window scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder
{
    /// Raw filename byte order (legacy behavior)
    #[default]
    Lexicographic,
    /// Slice position, then filename
    Numeric,
}

impl SortOrder
{
    /// Stable sort in place. Entries with equal keys keep their input order.
    pub fn sort(
        self,
        files: &mut [ParsedFile],
    )
    {
        match self
        {
            SortOrder::Lexicographic => files.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOrder::Numeric => files.sort_by(|a, b| {
                a.position
                    .cmp(&b.position)
                    .then_with(|| a.name.cmp(&b.name))
            }),
        }
    }
}

impl std::fmt::Display for SortOrder
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        match self
        {
            SortOrder::Lexicographic => write!(f, "lexicographic"),
            SortOrder::Numeric => write!(f, "numeric"),
        }
    }
}

/// Configured selection run. `interval` stays optional until `select`
/// so that a missing value surfaces as [`PickError::IntervalNotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector
{
    interval: Option<u64>,
    order: SortOrder,
}

impl Selector
{
    pub fn new(interval: Option<u64>) -> Self
    {
        Self { interval, order: SortOrder::default() }
    }

    /// (Optional) Choose the pre-scan ordering (default lexicographic).
    pub fn with_order(
        mut self,
        order: SortOrder,
    ) -> Self
    {
        self.order = order;
        self
    }

    /// Run the window scan over `files`.
    #[instrument(skip_all, fields(interval = ?self.interval, order = %self.order, files = files.len()))]
    pub fn select(
        &self,
        mut files: Vec<ParsedFile>,
    ) -> PickResult<SelectionResult>
    {
        let interval = match self.interval
        {
            Some(n) if n > 0 => n,
            _ => return Err(PickError::IntervalNotConfigured),
        };

        self.order
            .sort(&mut files);

        let (first, last) = match (files.first(), files.last())
        {
            (Some(f), Some(l)) => (f.position, l.position),
            _ => return Err(PickError::EmptyInput),
        };

        let mut picked = Vec::new();
        let mut rest: &[ParsedFile] = &files;
        let mut target = first;

        // An empty progression (last < first) only happens with
        // out-of-order input and yields an empty selection.
        while target <= last
        {
            let window_end = target.saturating_add(interval);
            let in_window = rest
                .iter()
                .take_while(|f| f.position < window_end)
                .count();

            trace!(window_start = target, window_end, candidates = in_window, "scanning window");

            if in_window == 0
            {
                match rest.first()
                {
                    // Sparse data: the next file lies ahead, wait for its window
                    Some(head) if head.position <= last =>
                    {
                        debug!(window_start = target, next = head.position, "no file in window, skipping");
                    }
                    // Out-of-order head beyond the last position: nothing can
                    // ever fill this window
                    Some(head) =>
                    {
                        debug!(window_start = target, head = head.position, last, "head beyond last position");
                        return Err(PickError::NoCandidatesInWindow { target });
                    }
                    // Unreachable while target <= last: exhausting the sequence
                    // needs a pick at or above last, which ends the progression
                    None => return Err(PickError::NoCandidatesInWindow { target }),
                }
            }
            else
            {
                let choice = pick_candidate(&rest[..in_window], target)
                    .ok_or(PickError::NoCandidatesInWindow { target })?
                    .clone();

                // Next pick must lie above both this pick and this target
                let cutoff = choice
                    .position
                    .max(target);
                let consumed = rest
                    .iter()
                    .take_while(|f| f.position <= cutoff)
                    .count();
                rest = &rest[consumed..];

                trace!(window_start = target, picked = %choice.name, cutoff, "picked");
                picked.push(choice);
            }

            target = match target.checked_add(interval)
            {
                Some(next) => next,
                None => break,
            };
        }

        info!(picked = picked.len(), from = files.len(), "selection complete");

        Ok(SelectionResult::new(picked))
    }
}

/// Shorthand for `Selector::new(interval).select(files)` with the
/// default ordering.
pub fn select(
    files: Vec<ParsedFile>,
    interval: Option<u64>,
) -> PickResult<SelectionResult>
{
    Selector::new(interval).select(files)
}

/// Rank candidates by `|position - target|`, lower position first on
/// ties, and return the winner. A versioned winner is resolved among all
/// entries sharing its position.
fn pick_candidate(
    candidates: &[ParsedFile],
    target: u64,
) -> Option<&ParsedFile>
{
    let mut ranked: Vec<&ParsedFile> = candidates
        .iter()
        .collect();

    // Stable: equal keys keep their working-sequence order
    ranked.sort_by_key(|f| (f.position.abs_diff(target), f.position));

    let best = *ranked.first()?;
    if !best.has_version
    {
        return Some(best);
    }

    // Same position means same key, so the versions are contiguous
    let versions: Vec<&ParsedFile> = ranked
        .iter()
        .copied()
        .take_while(|f| f.position == best.position)
        .collect();

    pick_version(&versions)
}

/// Versions carry no ordering of their own; the first one wins.
fn pick_version<'a>(versions: &[&'a ParsedFile]) -> Option<&'a ParsedFile>
{
    versions
        .first()
        .copied()
}
