//! CSV export of a plan's two paths.
//!
//! One row per traversed link:
//!
//! | Column      | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | `objective` | `shortest` or `fastest`                   |
//! | `seq`       | 0-based position of the link in its path  |
//! | `link`      | link key                                  |
//! | `length`    | metres                                    |
//! | `time`      | minutes, in the direction travelled       |

use std::io::Write;
use std::path::Path;

use csv::Writer;

use evac_spatial::{Objective, PathResult};

use crate::{PlanResult, RoutePlan};

/// Write both paths of `plan` to a new CSV file at `path`.
pub fn write_route_csv(plan: &RoutePlan, path: &Path) -> PlanResult<()> {
    let mut w = Writer::from_path(path)?;
    write_rows(&mut w, plan)?;
    w.flush()?;
    Ok(())
}

/// Write both paths of `plan` as CSV to any writer.
pub fn write_route<W: Write>(plan: &RoutePlan, out: W) -> PlanResult<()> {
    let mut w = Writer::from_writer(out);
    write_rows(&mut w, plan)?;
    w.flush()?;
    Ok(())
}

fn write_rows<W: Write>(w: &mut Writer<W>, plan: &RoutePlan) -> PlanResult<()> {
    w.write_record(["objective", "seq", "link", "length", "time"])?;
    write_path(w, Objective::Length, &plan.shortest_path)?;
    write_path(w, Objective::Time, &plan.fastest_path)?;
    Ok(())
}

fn write_path<W: Write>(w: &mut Writer<W>, objective: Objective, path: &PathResult) -> PlanResult<()> {
    let rows = path.link_keys.iter().zip(&path.link_lengths).zip(&path.link_times);
    for (seq, ((key, length), time)) in rows.enumerate() {
        w.write_record(&[
            objective.as_str().to_owned(),
            seq.to_string(),
            key.clone(),
            format!("{length:.3}"),
            format!("{time:.4}"),
        ])?;
    }
    Ok(())
}
