//! Behavioral properties of the selection engine.
//!
//! Scenario tests pin the documented outcomes; proptest covers the
//! general invariants over zero-padded (so name order == numeric order)
//! and numerically ordered inputs.

use proptest::prelude::*;

use slicepick::{
    PickError, SelectionResult, Selector, SliceParser, SortOrder, core::slice::DEFAULT_EXTENSION,
    select,
};

fn parse(names: &[String]) -> Vec<slicepick::ParsedFile>
{
    SliceParser::new(DEFAULT_EXTENSION)
        .expect("parser")
        .parse_all(names)
        .expect("parse")
}

fn strings(names: &[&str]) -> Vec<String>
{
    names
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn run(
    names: &[&str],
    interval: Option<u64>,
) -> Result<SelectionResult, PickError>
{
    select(parse(&strings(names)), interval)
}

#[test]
fn scenario_basic_prefers_unversioned()
{
    let out = run(&["10.bmp", "10a.bmp", "10b.bmp", "20.bmp", "31.bmp"], Some(10)).unwrap();
    assert_eq!(out.names(), vec!["10.bmp", "20.bmp", "31.bmp"]);
}

#[test]
fn scenario_version_tie_is_first_in_name_order()
{
    let out = run(&["5a.bmp", "5b.bmp"], Some(1)).unwrap();
    assert_eq!(out.names(), vec!["5a.bmp"]);
}

#[test]
fn scenario_gap_tolerance()
{
    let out = run(&["1.bmp", "50.bmp"], Some(10)).unwrap();
    assert_eq!(out.names(), vec!["1.bmp", "50.bmp"]);
}

#[test]
fn scenario_errors()
{
    assert!(matches!(run(&[], Some(10)), Err(PickError::EmptyInput)));
    assert!(matches!(run(&["1.bmp"], Some(0)), Err(PickError::IntervalNotConfigured)));
    assert!(matches!(run(&["1.bmp"], None), Err(PickError::IntervalNotConfigured)));
}

/// Zero-padded names so lexicographic and numeric order agree.
fn padded_names() -> impl Strategy<Value = Vec<String>>
{
    prop::collection::vec((0u64..400, prop::option::of(prop::char::range('a', 'c'))), 1..60)
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(n, v)| match v
                {
                    Some(letter) => format!("{n:04}{letter}.bmp"),
                    None => format!("{n:04}.bmp"),
                })
                .collect()
        })
}

/// Unpadded names with mixed digit counts.
fn unpadded_names() -> impl Strategy<Value = Vec<String>>
{
    prop::collection::vec(0u64..2000, 1..60).prop_map(|raw| {
        raw.into_iter()
            .map(|n| format!("{n}.bmp"))
            .collect()
    })
}

fn check_invariants(
    files: &[slicepick::ParsedFile],
    out: &SelectionResult,
    interval: u64,
) -> Result<(), TestCaseError>
{
    let first = files
        .iter()
        .map(|f| f.position)
        .min()
        .unwrap_or(0);
    let last = files
        .iter()
        .map(|f| f.position)
        .max()
        .unwrap_or(0);

    // Output length bound: ceil((last - first) / interval) + 1
    let bound = (last - first).div_ceil(interval) + 1;
    prop_assert!(out.len() as u64 <= bound);

    // Every pick comes from the input
    for e in out.entries()
    {
        prop_assert!(files.contains(e));
    }

    // Strictly increasing positions, and each pick is above the
    // previous pick's target
    let picks = out.entries();
    for pair in picks.windows(2)
    {
        prop_assert!(pair[1].position > pair[0].position);
    }
    let mut target = first;
    for (i, pair) in picks
        .windows(2)
        .enumerate()
    {
        // Smallest target whose window holds pick i
        while target + interval <= pair[0].position
        {
            target += interval;
        }
        prop_assert!(
            pair[1].position > pair[0].position.max(target),
            "pick {} at {} not above target {}",
            i + 1,
            pair[1].position,
            target
        );
        target += interval;
    }

    // The first slice is always kept
    if let Some(head) = picks.first()
    {
        prop_assert_eq!(head.position, first);
    }

    Ok(())
}

proptest! {
    #[test]
    fn padded_input_satisfies_invariants(names in padded_names(), interval in 1u64..40)
    {
        let files = parse(&names);
        let out = select(files.clone(), Some(interval)).expect("sorted input never strands a window");
        check_invariants(&files, &out, interval)?;
    }

    #[test]
    fn numeric_order_satisfies_invariants(names in unpadded_names(), interval in 1u64..200)
    {
        let files = parse(&names);
        let out = Selector::new(Some(interval))
            .with_order(SortOrder::Numeric)
            .select(files.clone())
            .expect("numeric order never strands a window");
        check_invariants(&files, &out, interval)?;
    }

    #[test]
    fn selection_is_deterministic_and_order_independent(names in padded_names(), interval in 1u64..40)
    {
        let files = parse(&names);
        let mut reversed = files.clone();
        reversed.reverse();

        let a = select(files.clone(), Some(interval)).expect("select");
        let b = select(files, Some(interval)).expect("select");
        let c = select(reversed, Some(interval)).expect("select");

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.names(), c.names());
    }

    #[test]
    fn lexicographic_failures_name_a_reachable_target(names in unpadded_names(), interval in 1u64..200)
    {
        let files = parse(&names);
        let mut by_name = files.clone();
        by_name.sort_by(|a, b| a.name.cmp(&b.name));
        let first = by_name[0].position;
        let last = by_name[by_name.len() - 1].position;

        match select(files, Some(interval))
        {
            Ok(out) => prop_assert!(out.len() <= names.len()),
            // The failing window is always one the progression really visits
            Err(PickError::NoCandidatesInWindow { target }) =>
            {
                prop_assert!(target >= first && target <= last);
                prop_assert_eq!((target - first) % interval, 0);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn interval_one_keeps_every_position(names in padded_names())
    {
        let files = parse(&names);
        let mut positions: Vec<u64> = files.iter().map(|f| f.position).collect();
        positions.sort_unstable();
        positions.dedup();

        let out = select(files, Some(1)).expect("select");
        let picked: Vec<u64> = out.entries().iter().map(|f| f.position).collect();
        prop_assert_eq!(picked, positions);
    }
}
