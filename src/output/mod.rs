//! Writes probe tables to, and reads them from, plain-text files

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::pe::GridSample;
use crate::table::ProbeTable;

mod error;
pub use error::*;

const HEADER: &str = "# r theta p0 p1 t0 t1 s0 s1";

fn write_rows<W: Write>(table: &ProbeTable, mut out: W) -> std::io::Result<()> {
    writeln!(out, "{}", HEADER)?;
    for (r, theta, node) in table.iter() {
        write!(out, "{:.6e} {:.6e}", r, theta)?;
        for v in node.to_array().iter() {
            write!(out, " {:.6e}", v)?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Writes `table` to `filename`, one row per node with θ varying fastest:
/// `r theta p0 p1 t0 t1 s0 s1`, where 0 and 1 label direct and
/// once-reflected light, and p, t and s are the probability, mean time
/// and standard deviation of the time.
pub fn write_table(table: &ProbeTable, filename: &str) -> Result<(), OutputError> {
    File::create(filename)
        .map(BufWriter::new)
        .and_then(|file| write_rows(table, file))
        .map_err(|_| OutputError::Write(filename.to_owned()))
}

/// Parses a file written by `write_table`.
pub fn read_table(filename: &str) -> Result<ProbeTable, OutputError> {
    let file = File::open(filename)
        .map_err(|_| OutputError::Read(filename.to_owned()))?;

    let mut rows: Vec<(usize, [f64; 8])> = Vec::new();

    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|_| OutputError::Read(filename.to_owned()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values = line.split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| OutputError::parse(filename, i + 1, &e.to_string()))?;

        if values.len() != 8 {
            let cause = format!("expected 8 columns, found {}", values.len());
            return Err(OutputError::parse(filename, i + 1, &cause));
        }

        let mut row = [0.0; 8];
        row.copy_from_slice(&values);
        rows.push((i + 1, row));
    }

    if rows.is_empty() {
        return Err(OutputError::parse(filename, 0, "table is empty"));
    }

    // θ varies fastest, so the first block of rows at fixed r gives the angles
    let first_r = rows[0].1[0];
    let thetas: Vec<f64> = rows.iter()
        .take_while(|(_, row)| row[0] == first_r)
        .map(|(_, row)| row[1])
        .collect();
    let n = thetas.len();

    if rows.len() % n != 0 {
        return Err(OutputError::parse(filename, rows[rows.len() - 1].0, "table is not rectangular"));
    }

    let radii: Vec<f64> = rows.iter().step_by(n).map(|(_, row)| row[0]).collect();

    // interpolation needs strictly increasing axes
    if let Some(k) = thetas.windows(2).position(|w| w[1] <= w[0]) {
        return Err(OutputError::parse(filename, rows[k + 1].0, "angles are not strictly increasing"));
    }
    if let Some(k) = radii.windows(2).position(|w| w[1] <= w[0]) {
        return Err(OutputError::parse(filename, rows[(k + 1) * n].0, "radii are not strictly increasing"));
    }

    for (k, (line, row)) in rows.iter().enumerate() {
        if row[0] != radii[k / n] || row[1] != thetas[k % n] {
            return Err(OutputError::parse(filename, *line, "row does not lie on the (r, theta) mesh"));
        }
    }

    let nodes: Vec<GridSample> = rows.iter()
        .map(|(_, row)| {
            let mut v = [0.0; 6];
            v.copy_from_slice(&row[2..]);
            GridSample::from_array(v)
        })
        .collect();

    ProbeTable::from_nodes(radii, thetas, nodes)
        .ok_or_else(|| OutputError::parse(filename, 0, "table is not rectangular"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("petrel-{}-{}", std::process::id(), name))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn file_round_trip() {
        let radii = vec![0.2, 8.35, 16.5];
        let thetas = vec![0.0, 1.5, 3.0];
        let nodes: Vec<GridSample> = (0..9)
            .map(|k| {
                let k = k as f64;
                GridSample::from_array([1.0e-4 / (k + 1.0), 1.0e-7 * k, 9.0e-8 + k * 1.0e-9, 2.0e-7, 1.0e-9, 0.0])
            })
            .collect();
        let table = ProbeTable::from_nodes(radii, thetas, nodes).unwrap();

        let filename = scratch("round-trip.dat");
        write_table(&table, &filename).unwrap();
        let contents = std::fs::read_to_string(&filename).unwrap();
        println!("{}", contents);
        assert!(contents.starts_with(HEADER));
        assert_eq!(contents.lines().count(), 10);

        let copy = read_table(&filename).unwrap();
        std::fs::remove_file(&filename).ok();

        assert_eq!(copy.radii(), table.radii());
        assert_eq!(copy.thetas(), table.thetas());
        for ((_, _, a), (_, _, b)) in copy.iter().zip(table.iter()) {
            for (x, y) in a.to_array().iter().zip(b.to_array().iter()) {
                assert!((x - y).abs() <= 1.0e-6 * y.abs());
            }
        }
    }

    #[test]
    fn malformed_files() {
        let filename = scratch("malformed.dat");

        std::fs::write(&filename, format!("{}\n0 0 1 1 1 1 1\n", HEADER)).unwrap();
        let result = read_table(&filename);
        println!("{:?}", result);
        assert!(matches!(result, Err(OutputError::Parse(_, 2, _))));

        std::fs::write(&filename, "0 0 1 1 1 1 1 x\n").unwrap();
        assert!(matches!(read_table(&filename), Err(OutputError::Parse(_, 1, _))));

        // three rows cannot make a 2 × 2 table
        std::fs::write(&filename, "0 0 1 1 1 1 1 1\n0 1 1 1 1 1 1 1\n1 0 1 1 1 1 1 1\n").unwrap();
        assert!(matches!(read_table(&filename), Err(OutputError::Parse(..))));

        // second block has the wrong angles
        std::fs::write(&filename, "0 0 1 1 1 1 1 1\n0 1 1 1 1 1 1 1\n1 0 1 1 1 1 1 1\n1 2 1 1 1 1 1 1\n").unwrap();
        assert!(matches!(read_table(&filename), Err(OutputError::Parse(_, 4, _))));

        std::fs::remove_file(&filename).ok();

        assert!(matches!(read_table(&scratch("missing.dat")), Err(OutputError::Read(_))));
    }

    #[test]
    fn unordered_axes() {
        let filename = scratch("unordered.dat");

        // radii run backwards
        std::fs::write(&filename, "2 0 1 0 0 0 0 0\n2 1 1 0 0 0 0 0\n0 0 3 0 0 0 0 0\n0 1 3 0 0 0 0 0\n").unwrap();
        let result = read_table(&filename);
        println!("{:?}", result);
        assert!(matches!(result, Err(OutputError::Parse(_, 3, _))));

        // angles run backwards
        std::fs::write(&filename, "0 1 1 0 0 0 0 0\n0 0 1 0 0 0 0 0\n1 1 3 0 0 0 0 0\n1 0 3 0 0 0 0 0\n").unwrap();
        assert!(matches!(read_table(&filename), Err(OutputError::Parse(_, 2, _))));

        // the same table in order reads back and interpolates
        std::fs::write(&filename, "0 0 3 0 0 0 0 0\n0 1 3 0 0 0 0 0\n2 0 1 0 0 0 0 0\n2 1 1 0 0 0 0 0\n").unwrap();
        let table = read_table(&filename).unwrap();
        assert!((table.evaluate(1.0, 0.5).direct_probability - 2.0).abs() < 1.0e-12);

        std::fs::remove_file(&filename).ok();
    }
}
