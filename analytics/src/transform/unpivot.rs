//! Wide-to-narrow reshaping.
//!
//! A wide row often repeats one attribute across fixed, numbered columns
//! (`actor_1_name`..`actor_3_name`, one flag column per genre). Unpivoting
//! stacks those slots into one frame with a row per (source row, slot),
//! tagged with the slot's 1-based position.
//!
//! ```text
//!  title │ a1 │ a2 │ a3              title │ position │ value
//! ───────┼────┼────┼────    →       ───────┼──────────┼──────
//!  Heat  │ X  │ Y  │ -                Heat  │    1     │  X
//!                                     Heat  │    2     │  Y
//!                                     Heat  │    3     │  -
//! ```
//!
//! A slot is a list of expressions rather than a single column, so parallel
//! columns (an actor name and its likes) stay paired in one long row.

use polars::prelude::*;

use super::frame::select_columns;

/// Stack `slots` of `frame` into a long lazy frame.
///
/// Each output row carries the `index` columns of its source row, the
/// slot's expressions (aliased by the caller to shared names) and a `u32`
/// `position` column. Slots are stacked in order, so rows come out slot
/// by slot. Nothing is filtered here.
pub fn unpivot(frame: &DataFrame, index: &[&str], slots: Vec<Vec<Expr>>, position: &str) -> PolarsResult<LazyFrame> {
    if slots.is_empty() {
        return Err(PolarsError::NoData("no columns to unpivot".into()));
    }

    let stacked = slots
        .into_iter()
        .zip(1u32..)
        .map(|(values, slot)| {
            let mut exprs = select_columns(index);
            exprs.extend(values);
            exprs.push(lit(slot).alias(position));
            frame.clone().lazy().select(exprs)
        })
        .collect::<Vec<_>>();

    concat(stacked, UnionArgs::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::frame::testing::{int_at, texts};

    fn wide() -> DataFrame {
        df!(
            "title" => ["Heat", "Ronin"],
            "a1" => ["X", "Z"],
            "a2" => [Some("Y"), None],
            "l1" => [1.0, 2.0],
            "l2" => [3.0, 4.0]
        )
        .unwrap()
    }

    fn slot(name: &str, likes: &str) -> Vec<Expr> {
        vec![col(name).alias("name"), col(likes).alias("likes")]
    }

    #[test]
    fn test_one_row_per_source_row_and_slot() {
        let long = unpivot(&wide(), &["title"], vec![slot("a1", "l1"), slot("a2", "l2")], "position")
            .unwrap()
            .collect()
            .unwrap();

        assert_eq!(long.height(), 4);
        assert_eq!(texts(&long, "title"), vec!["Heat", "Ronin", "Heat", "Ronin"]);
        assert_eq!(texts(&long, "name"), vec!["X", "Z", "Y", ""]);
        assert_eq!(int_at(&long, "position", 0), Some(1));
        assert_eq!(int_at(&long, "position", 3), Some(2));
        assert_eq!(int_at(&long, "likes", 2), Some(3));
    }

    #[test]
    fn test_nothing_filtered() {
        let long = unpivot(&wide(), &[], vec![vec![col("a2").alias("name")]], "position")
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(long.height(), 2);
        assert_eq!(long.column("name").unwrap().null_count(), 1);
        assert_eq!(long.width(), 2);
    }

    #[test]
    fn test_literal_slot_values() {
        let long = unpivot(
            &wide(),
            &["title"],
            vec![vec![lit("first").alias("which")], vec![lit("second").alias("which")]],
            "position",
        )
        .unwrap()
        .collect()
        .unwrap();
        assert_eq!(texts(&long, "which"), vec!["first", "first", "second", "second"]);
    }

    #[test]
    fn test_no_slots() {
        assert!(unpivot(&wide(), &["title"], Vec::new(), "position").is_err());
    }
}
