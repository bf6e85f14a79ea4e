use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use telemetry_core::protocol::encode_fields;
use thiserror::Error;

use crate::labels::{ORK_LABELS, TIME_COLUMN, label_index};

#[derive(Debug, Error)]
pub(crate) enum RowsError {
    #[error("failed to read flight data: {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read flight data")]
    Read(#[from] io::Error),

    #[error("line {line}: {count} columns, at most {} expected", ORK_LABELS.len())]
    TooManyColumns { line: usize, count: usize },

    #[error("line {line}: bad Time value {value:?}")]
    BadTime { line: usize, value: String },

    #[error("line {line}: no value for column {label:?}")]
    MissingColumn { line: usize, label: &'static str },

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("field list is empty")]
    EmptySelection,
}

pub(crate) type Result<T> = std::result::Result<T, RowsError>;

/// Одна строка экспорта: значения по порядку [`ORK_LABELS`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    /// номер строки в файле (с 1)
    pub(crate) line: usize,
    /// время от старта, с
    pub(crate) time: f64,
    values: Vec<String>,
}

impl Row {
    fn value(&self, column: usize) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Кадр с выбранными колонками: "Label:value;...@@"
    pub(crate) fn encode(&self, selection: &Selection) -> String {
        encode_fields(
            selection
                .columns
                .iter()
                .map(|&c| (ORK_LABELS[c], self.value(c).unwrap_or_default())),
        )
    }
}

/// Какие колонки уходят клиенту и в каком порядке
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection {
    columns: Vec<usize>,
}

impl Selection {
    pub(crate) fn all() -> Self {
        Self {
            columns: (0..ORK_LABELS.len()).collect(),
        }
    }

    /// Парсит список вида "Time, Simulation time step,Computation time".
    /// Порядок сохраняется, пустые элементы игнорируются.
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let columns = raw
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| label_index(l).ok_or_else(|| RowsError::UnknownField(l.to_string())))
            .collect::<Result<Vec<_>>>()?;

        if columns.is_empty() {
            return Err(RowsError::EmptySelection);
        }
        Ok(Self { columns })
    }

    /// У каждой строки должны быть все выбранные колонки
    pub(crate) fn check(&self, rows: &[Row]) -> Result<()> {
        for row in rows {
            for &c in &self.columns {
                if row.value(c).is_none() {
                    return Err(RowsError::MissingColumn {
                        line: row.line,
                        label: ORK_LABELS[c],
                    });
                }
            }
        }
        Ok(())
    }
}

/// Чтение строк экспорта.
/// Строки, начинающиеся с `#`, и пустые строки пропускаются.
pub(crate) fn read_rows<R: io::Read>(reader: R) -> Result<Vec<Row>> {
    let buf = BufReader::new(reader);
    let mut rows = Vec::new();

    for (idx, line) in buf.lines().enumerate() {
        let line = line?;
        if let Some(row) = parse_line(idx + 1, &line)? {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Чтение строк экспорта из файла
pub(crate) fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|source| RowsError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(f)
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<Row>> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let values: Vec<String> = line.split(',').map(|v| v.trim().to_string()).collect();
    if values.len() > ORK_LABELS.len() {
        return Err(RowsError::TooManyColumns {
            line: line_no,
            count: values.len(),
        });
    }

    let raw_time = &values[TIME_COLUMN];
    let time = raw_time
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| RowsError::BadTime {
            line: line_no,
            value: raw_time.clone(),
        })?;

    Ok(Some(Row {
        line: line_no,
        time,
        values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn csv_row(time: &str) -> String {
        let mut cols = vec!["0"; ORK_LABELS.len()];
        cols[0] = time;
        cols[52] = "0.01";
        cols[53] = "0.002";
        cols.join(",")
    }

    #[test]
    fn read_rows_skips_comments_and_blank_lines() {
        let input = format!(
            "# OpenRocket export\n#Time (s),Altitude (m)\n\n{}\n   \n{}\n",
            csv_row("0"),
            csv_row("0.5")
        );
        let rows = read_rows(Cursor::new(input)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 4);
        assert_eq!(rows[1].time, 0.5);
    }

    #[test]
    fn read_rows_handles_crlf() {
        let input = format!("{}\r\n", csv_row("1.25"));
        let rows = read_rows(Cursor::new(input)).unwrap();
        assert_eq!(rows[0].time, 1.25);
        assert_eq!(rows[0].value(53), Some("0.002"));
    }

    #[test]
    fn bad_time_is_reported_with_line() {
        let err = read_rows(Cursor::new("abc,1,2\n")).unwrap_err();
        assert!(matches!(err, RowsError::BadTime { line: 1, .. }));
    }

    #[test]
    fn too_many_columns_rejected() {
        let line = vec!["1"; ORK_LABELS.len() + 1].join(",");
        let err = read_rows(Cursor::new(line)).unwrap_err();
        assert!(matches!(err, RowsError::TooManyColumns { count: 55, .. }));
    }

    #[test]
    fn default_selection_encodes_client_fields() {
        let rows = read_rows(Cursor::new(csv_row("0.5"))).unwrap();
        let sel = Selection::parse(crate::config::DEFAULT_FIELDS).unwrap();
        sel.check(&rows).unwrap();

        let frame = rows[0].encode(&sel);
        assert_eq!(
            frame,
            "Time:0.5;Simulation time step:0.01;Computation time:0.002;@@"
        );

        let body = frame.strip_suffix("@@").unwrap();
        let rec = telemetry_core::decode_record(body).unwrap();
        assert_eq!(rec.time, 0.5);
        assert_eq!(rec.comp_time, 0.002);
    }

    #[test]
    fn selection_keeps_order_and_rejects_unknown() {
        let sel = Selection::parse(" Altitude, ,Time ").unwrap();
        assert_eq!(sel.columns, vec![1, 0]);

        assert!(matches!(
            Selection::parse("Time,Apogee"),
            Err(RowsError::UnknownField(f)) if f == "Apogee"
        ));
        assert!(matches!(Selection::parse(" , "), Err(RowsError::EmptySelection)));
    }

    #[test]
    fn selection_check_finds_short_rows() {
        let rows = read_rows(Cursor::new("1.0,120.5\n")).unwrap();
        assert!(Selection::parse("Time,Altitude").unwrap().check(&rows).is_ok());

        let err = Selection::all().check(&rows).unwrap_err();
        assert!(matches!(
            err,
            RowsError::MissingColumn { line: 1, label: "Vertical velocity" }
        ));
    }

    #[test]
    fn read_rows_from_path_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# comment").unwrap();
        writeln!(f, "{}", csv_row("0")).unwrap();
        writeln!(f, "{}", csv_row("0.1")).unwrap();

        let rows = read_rows_from_path(f.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rows_from_path(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, RowsError::ReadFile { .. }));
    }
}
