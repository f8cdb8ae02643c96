use std::io::Write;

use anyhow::{Context, Result};

use super::model::Dataset;

/// Write the header and the given rows as CSV. Every row is written with
/// exactly one cell per header; missing cells become empty fields.
pub fn write_csv<W: Write>(dataset: &Dataset, visible: &[usize], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(dataset.headers())
        .context("writing CSV header")?;

    let width = dataset.headers().len();
    for &row in visible {
        let record = (0..width).map(|col| dataset.cell(row, col).unwrap_or_default());
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_selected_rows_padded_to_header() {
        let ds = Dataset::new(
            vec!["Name".into(), "Price".into()],
            vec![
                vec!["A".into(), "1".into()],
                vec!["B".into()],
                vec!["C, Inc".into(), "3".into(), "x".into()],
            ],
            vec![],
        )
        .unwrap();
        let mut buf = Vec::new();
        write_csv(&ds, &[1, 2], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Name,Price\nB,\n\"C, Inc\",3\n"
        );
    }
}
