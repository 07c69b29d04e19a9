//! Integration tests for the Aggregator API
//!
//! These tests drive the public API the way a validation layer would.

use std::{collections::BTreeMap, num::ParseIntError};

use thiserror::Error;

use tally::{
    AggregateError, Aggregator, CatchKinds, ErrorTree, Failure, LookupError, TallyError,
    aggregate, config::AggregatorConfig,
};

#[derive(Debug, Error)]
enum FieldError {
    #[error("required")]
    Required,

    #[error("must be at most {0} characters")]
    TooLong(usize),

    #[error("not a number: {0}")]
    NotANumber(#[from] ParseIntError),
}

#[derive(Debug, Error)]
#[error("storage offline")]
struct StorageOffline;

fn validate_name(name: &str) -> Result<(), FieldError> {
    match name.len() {
        0 => Err(FieldError::Required),
        len if len > 8 => Err(FieldError::TooLong(8)),
        _ => Ok(()),
    }
}

fn validate_age(age: &str) -> Result<u32, FieldError> {
    Ok(age.parse()?)
}

fn validate_form(form: &BTreeMap<&str, &str>) -> Result<u32, TallyError> {
    aggregate(AggregatorConfig::default(), |agg| {
        let name = form.get("name").copied().unwrap_or_default();
        let age = form.get("age").copied().unwrap_or_default();

        agg.run_checked_child("name", || validate_name(name))?;
        let age = agg.run_checked_child("age", || validate_age(age))?;

        if name == "root" && age == Some(0) {
            agg.record_own(Failure::msg("root must have an age"))?;
        }
        Ok(age.unwrap_or_default())
    })
}

#[test]
fn test_valid_form_passes() {
    let form = BTreeMap::from([("name", "ada"), ("age", "36")]);

    assert_eq!(validate_form(&form).unwrap(), 36);
}

#[test]
fn test_every_field_error_is_reported() {
    let form = BTreeMap::from([("name", "a very long name"), ("age", "old")]);

    let err = validate_form(&form).unwrap_err();
    assert_eq!(
        err.to_string(),
        "age: [not a number: invalid digit found in string], \
         name: [must be at most 8 characters]"
    );

    let tree = err.tree().expect("validation failures are aggregated");
    assert!(tree["age"][0].is::<FieldError>());
    assert_eq!(tree.failure_count(), 2);
}

#[test]
fn test_cross_field_error_is_an_own_failure() {
    let form = BTreeMap::from([("name", "root"), ("age", "0")]);

    let err = validate_form(&form).unwrap_err();
    assert_eq!(err.to_string(), "root must have an age");
    assert!(err.tree().unwrap().children().is_empty());
}

#[test]
fn test_scenario_record_then_check_child() {
    let mut agg = Aggregator::default();
    agg.record_own(Failure::msg("bad price")).unwrap();
    agg.run_checked_child("x", || Err::<(), _>(Failure::msg("x failed")))
        .unwrap();

    assert!(agg.has_errors());
    assert_eq!(agg.tree().full_summary(), "bad price; x: [x failed]");
}

#[test]
fn test_scenario_nothing_recorded() {
    let agg = Aggregator::default();

    assert!(!agg.has_errors());
    assert!(agg.raise_if_any().is_ok());
}

#[test]
fn test_scenario_autoraise_is_cumulative() {
    let mut agg = Aggregator::new(AggregatorConfig::new(true));

    let first = agg.record_own(Failure::msg("bad price")).unwrap_err();
    assert_eq!(first.tree().unwrap().full_summary(), "bad price");

    let second = agg
        .record_child("foo", Failure::msg("foo bad"))
        .unwrap_err();
    assert_eq!(
        second.tree().unwrap().full_summary(),
        "bad price; foo: [foo bad]"
    );
}

#[test]
fn test_scenario_merging_two_trees() {
    let mut left = ErrorTree::new();
    left.add_own(Failure::msg("left own"));
    left.add_child_error("foo", Failure::msg("left foo"));

    let mut right = ErrorTree::new();
    right.add_own(Failure::msg("right own"));
    right.add_child_error("foo", Failure::msg("right foo"));

    left.add_own(AggregateError::new(right));

    let own: Vec<_> = left.own().iter().map(ToString::to_string).collect();
    assert_eq!(own, ["left own", "right own"]);

    let foo: Vec<_> = left["foo"].own().iter().map(ToString::to_string).collect();
    assert_eq!(foo, ["left foo", "right foo"]);
}

#[test]
fn test_unexpected_failures_fail_fast() {
    let config = AggregatorConfig::default().with_catch(CatchKinds::only::<FieldError>());
    let mut agg = Aggregator::new(config);

    agg.run_checked_child("name", || validate_name(""))
        .unwrap();
    let err = agg
        .run_checked_child("save", || Err::<(), _>(StorageOffline))
        .unwrap_err();

    assert!(!err.is_aggregate());
    assert_eq!(err.to_string(), "storage offline");
    assert!(agg.tree().child("save").is_none());
    assert_eq!(agg.tree().full_summary(), "name: [required]");
}

#[test]
fn test_batch_items_from_branch_aggregators() {
    let batches = [vec!["1", "x"], vec!["y", "3"]];

    let mut outer = Aggregator::default();
    for (index, batch) in batches.iter().enumerate() {
        let mut branch = Aggregator::default();
        for (item, raw) in batch.iter().enumerate() {
            branch
                .run_checked_child(format!("item{item}"), || validate_age(raw))
                .unwrap();
        }
        outer
            .record_child(format!("batch{index}"), AggregateError::new(branch.into_tree()))
            .unwrap();
    }

    assert_eq!(
        outer.tree().full_summary(),
        "batch0: [item1: [not a number: invalid digit found in string]], \
         batch1: [item0: [not a number: invalid digit found in string]]"
    );
}

#[test]
fn test_finished_branches_merge_under_one_step() {
    fn check_zip(raw: &str) -> Result<(), TallyError> {
        let mut agg = Aggregator::default();
        agg.run_checked_child("zip", || validate_age(raw))?;
        agg.finish()
    }

    let mut tree = ErrorTree::new();
    for raw in ["1x", "2x"] {
        if let Err(err) = check_zip(raw) {
            tree.add_child_error("address", err);
        }
    }

    assert_eq!(
        tree.full_summary(),
        "address: [zip: [not a number: invalid digit found in string, \
         not a number: invalid digit found in string]]"
    );
    assert_eq!(tree.failure_count(), 2);
    assert!(tree["address"]["zip"][1].is::<FieldError>());
    assert!(matches!(
        tree["address"].get(0),
        Err(LookupError::IndexOutOfRange { .. })
    ));
}
