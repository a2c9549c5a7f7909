use std::io::{self, Write};

use crate::catchment::QueryResult;
use crate::genomics::Direction;

/// Header row of a catchment ranking.
pub const RANKING_HEADER: &str = "query,closestsame,closestup,closestdown,closestside";

/// Write results, one row per query in the order given.
pub fn write_ranking<W: Write>(writer: &mut W, results: &[QueryResult]) -> io::Result<()> {
    writeln!(writer, "{RANKING_HEADER}")?;
    for result in results {
        let cells: Vec<String> = Direction::ALL
            .iter()
            .map(|&direction| result.names(direction).join(";"))
            .collect();
        writeln!(writer, "{},{}", result.query, cells.join(","))?;
    }
    writer.flush()
}

/// Render results into a string (useful for tests and snapshots).
pub fn render_ranking(results: &[QueryResult]) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_ranking(&mut buffer, results)?;
    String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
