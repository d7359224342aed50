//! Terminal confirmation for widening the search past the hard cap.

use std::io::{self, BufRead, Write};

use log::warn;

use evac_plan::ConfirmationPort;

/// How the demo answers "search further?".
pub enum Confirm {
    /// Ask on stdin.  Anything but `y` declines.
    Stdin,
    /// Answer yes up to `remaining` times, then no.
    Scripted { remaining: u32 },
}

impl ConfirmationPort for Confirm {
    fn ask_proceed(&mut self, current_radius: f64) -> bool {
        match self {
            Confirm::Stdin => ask_stdin(current_radius),
            Confirm::Scripted { remaining } => {
                if *remaining == 0 {
                    return false;
                }
                *remaining -= 1;
                true
            }
        }
    }
}

fn ask_stdin(current_radius: f64) -> bool {
    eprint!(
        "{current_radius} m search radius reached without a safe altitude. \
         Type 'y' to keep searching, anything else to use the best point so far: "
    );
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => line.trim().eq_ignore_ascii_case("y"),
        Err(e) => {
            warn!("could not read confirmation: {e}");
            false
        }
    }
}
