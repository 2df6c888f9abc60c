//! `reffinder index` command implementation.

use std::path::Path;

use reffinder::{Config, Session};

use super::display::{print_index_origin, print_issues};

/// Run the index command.
pub fn run(root: &Path, config: Config, rebuild: bool) -> Result<(), reffinder::Error> {
    let mut session = Session::open(root, config)?;

    if rebuild && session.build_stats().is_none() {
        session.rebuild();
    }

    print_index_origin(session.load_outcome(), session.build_stats());
    print_issues("Meta file problems", session.corpus().issues());
    Ok(())
}
