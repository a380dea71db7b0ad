//! Workbook loading: one sheet per year, reshaped into inspection records

use crate::activity::cut_tos;
use crate::constants::*;
use crate::types::{InspectionRecord, YearDataset};
use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

/// Sheet cells in absolute coordinates from A1, `None` for empty cells
pub type Grid = Vec<Vec<Option<String>>>;

/// Labelled rows of one sheet after empty-row filtering
#[derive(Debug, Clone, PartialEq)]
pub struct SheetFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetFrame {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// How a sheet's labels line up with its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    Standard,
    /// Labels sit one column left of their data: drop the first column and
    /// move every label one step right.
    ShiftedHeader,
}

const SHIFTED_RENAMES: &[(&str, &str)] = &[
    ("DATA REGISTRO", COL_CITY),
    ("TITULOS", COL_REGISTERED),
    ("ATIVIDADES", COL_TITLES),
    ("OBSERVACAO OBRA SERVICO", COL_ACTIVITIES),
    ("Unnamed: 6", COL_NOTES),
];

impl SheetLayout {
    pub fn for_year(year: i32) -> Self {
        if SHIFTED_HEADER_YEARS.contains(&year) {
            Self::ShiftedHeader
        } else {
            Self::Standard
        }
    }

    pub fn apply(self, frame: &mut SheetFrame) {
        match self {
            Self::Standard => {}
            Self::ShiftedHeader => {
                if frame.columns.is_empty() {
                    return;
                }
                frame.columns.remove(0);
                for row in &mut frame.rows {
                    row.remove(0);
                }
                let renames: HashMap<&str, &str> = SHIFTED_RENAMES.iter().copied().collect();
                for column in &mut frame.columns {
                    if let Some(renamed) = renames.get(column.as_str()) {
                        *column = (*renamed).to_string();
                    }
                }
            }
        }
    }
}

/// Year of a sheet: its name when that is a year, otherwise by position.
pub fn sheet_year(name: &str, position: usize) -> i32 {
    name.trim()
        .parse()
        .unwrap_or(FIRST_YEAR + position as i32)
}

/// Render a cell the way it should appear in text columns.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| dt.as_f64().to_string()),
        ),
    }
}

/// Expand a calamine range into a grid anchored at A1.
pub fn sheet_grid(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let mut grid: Grid = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells: Vec<Option<String>> = vec![None; start_col as usize];
        cells.extend(row.iter().map(cell_text));
        grid.push(cells);
    }
    grid
}

/// Whether a text cell stands for a missing value (exact match, case-sensitive).
fn is_missing_marker(text: &str) -> bool {
    MISSING_VALUE_MARKERS.contains(&text)
}

fn cell(row: &[Option<String>], col: usize) -> Option<&str> {
    row.get(col).and_then(|c| c.as_deref())
}

/// Body cell, with missing-value markers read as empty. Header labels keep them.
fn value(row: &[Option<String>], col: usize) -> Option<&str> {
    cell(row, col).filter(|v| !is_missing_marker(v))
}

/// Label the columns from `header_row` and keep the fully populated rows below it.
///
/// Columns with neither a label nor any value are not part of the frame.
/// Cells holding a missing-value marker such as `N/A` count as empty.
/// Unlabelled columns are named `Unnamed: <index>`, repeated labels get a
/// `.1`, `.2`... suffix.
pub fn frame_from_grid(grid: &Grid, header_row: usize) -> SheetFrame {
    let Some(header) = grid.get(header_row) else {
        return SheetFrame { columns: Vec::new(), rows: Vec::new() };
    };
    let body = &grid[header_row + 1..];
    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let populated: Vec<usize> = (0..width)
        .filter(|&col| {
            cell(header, col).is_some_and(|h| !h.trim().is_empty())
                || body.iter().any(|row| value(row, col).is_some())
        })
        .collect();

    let mut seen: HashMap<String, usize> = HashMap::new();
    let columns: Vec<String> = populated
        .iter()
        .map(|&col| {
            let base = match cell(header, col).map(str::trim) {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => format!("Unnamed: {col}"),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 { base } else { format!("{base}.{count}") };
            *count += 1;
            name
        })
        .collect();

    let rows: Vec<Vec<String>> = body
        .iter()
        .filter_map(|row| {
            populated
                .iter()
                .map(|&col| value(row, col).map(str::to_string))
                .collect::<Option<Vec<String>>>()
        })
        .collect();

    debug!(
        columns = columns.len(),
        kept = rows.len(),
        dropped = body.len() - rows.len(),
        "Sheet frame built"
    );
    SheetFrame { columns, rows }
}

/// Turn a reshaped frame into records, cutting the activity of each row.
pub fn records_from_frame(frame: &SheetFrame) -> Result<Vec<InspectionRecord>> {
    let Some(activities_col) = frame.column_index(COL_ACTIVITIES) else {
        bail!("Missing {COL_ACTIVITIES} column (found: {})", frame.columns.join(", "));
    };
    let city_col = frame.column_index(COL_CITY);
    let registered_col = frame.column_index(COL_REGISTERED);
    let titles_col = frame.column_index(COL_TITLES);
    let notes_col = frame.column_index(COL_NOTES);

    let records = frame
        .rows
        .iter()
        .map(|row| {
            let field = |col: Option<usize>| col.and_then(|c| row.get(c)).cloned();
            let activities = row[activities_col].clone();
            InspectionRecord {
                city: field(city_col),
                registered_on: field(registered_col),
                titles: field(titles_col),
                activity: cut_tos(&activities),
                activities,
                notes: field(notes_col),
            }
        })
        .collect();
    Ok(records)
}

/// Build the dataset of one year sheet from its grid.
pub fn dataset_from_grid(year: i32, sheet_name: &str, grid: &Grid) -> Result<YearDataset> {
    let mut frame = frame_from_grid(grid, HEADER_ROW);
    SheetLayout::for_year(year).apply(&mut frame);
    let records = records_from_frame(&frame)
        .with_context(|| format!("Sheet '{sheet_name}' ({year})"))?;
    Ok(YearDataset {
        year,
        sheet_name: sheet_name.to_string(),
        records,
    })
}

/// Read every year sheet of the workbook at `path`.
pub fn load_workbook(path: &Path) -> Result<BTreeMap<i32, YearDataset>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let mut datasets = BTreeMap::new();
    for (position, name) in workbook.sheet_names().into_iter().enumerate() {
        let year = sheet_year(&name, position);
        if datasets.contains_key(&year) {
            warn!(sheet = %name, year, "Duplicate year sheet, skipping");
            continue;
        }
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                warn!(sheet = %name, error = %e, "Failed to read sheet, skipping");
                continue;
            }
        };
        match dataset_from_grid(year, &name, &sheet_grid(&range)) {
            Ok(dataset) => {
                info!(
                    sheet = %name,
                    year,
                    records = dataset.records.len(),
                    unclassified = dataset.unclassified_count(),
                    "Sheet loaded"
                );
                datasets.insert(year, dataset);
            }
            Err(e) => warn!(error = %format!("{e:#}"), "Skipping sheet"),
        }
    }

    if datasets.is_empty() {
        bail!("No usable year sheet in {}", path.display());
    }
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                    .collect()
            })
            .collect()
    }

    fn preamble() -> Vec<&'static [&'static str]> {
        let mut rows: Vec<&'static [&'static str]> = vec![&["PESQUISA DE ART"]];
        rows.extend(std::iter::repeat(&[][..]).take(HEADER_ROW - 1));
        rows
    }

    #[test]
    fn test_sheet_year_from_name_or_position() {
        assert_eq!(sheet_year("2024", 5), 2024);
        assert_eq!(sheet_year(" 2023 ", 0), 2023);
        assert_eq!(sheet_year("Planilha1", 0), 2022);
        assert_eq!(sheet_year("Planilha3", 2), 2024);
    }

    #[test]
    fn test_layout_for_year() {
        assert_eq!(SheetLayout::for_year(2023), SheetLayout::ShiftedHeader);
        assert_eq!(SheetLayout::for_year(2022), SheetLayout::Standard);
    }

    #[test]
    fn test_cell_text_variants() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String(String::new())), None);
        assert_eq!(cell_text(&Data::String("BH".into())).as_deref(), Some("BH"));
        assert_eq!(cell_text(&Data::Int(7)).as_deref(), Some("7"));
        assert_eq!(cell_text(&Data::Float(3.0)).as_deref(), Some("3"));
        assert_eq!(cell_text(&Data::Float(2.5)).as_deref(), Some("2.5"));
        assert_eq!(cell_text(&Data::Bool(true)).as_deref(), Some("true"));
    }

    #[test]
    fn test_frame_skips_preamble_and_drops_incomplete_rows() {
        let mut rows = preamble();
        rows.push(&["CIDADE", "DATA REGISTRO", "TITULOS", "ATIVIDADES", "OBSERVACAO OBRA SERVICO"]);
        rows.push(&["Belo Horizonte", "2022-03-01", "Eng. Civil", "a|b|Obras civis |", "ok"]);
        rows.push(&["Contagem", "2022-03-02", "Eng. Civil", "a|b|Obras civis |", ""]);
        rows.push(&["Betim", "2022-03-03", "Eng. Mecânico", "a|b|Caldeiras |", "ok"]);
        let frame = frame_from_grid(&grid(&rows), HEADER_ROW);

        assert_eq!(frame.columns.len(), 5);
        assert_eq!(frame.rows.len(), 2);
        assert_eq!(frame.rows[1][0], "Betim");
    }

    #[test]
    fn test_missing_markers_match_exactly() {
        for marker in ["N/A", "NA", "#N/A", "NULL", "null", "NaN", "nan", "None", "<NA>", "n/a"] {
            assert!(is_missing_marker(marker), "{marker}");
        }
        assert!(!is_missing_marker("N/A "));
        assert!(!is_missing_marker("Nada"));
    }

    #[test]
    fn test_header_label_may_look_like_marker() {
        let mut rows = preamble();
        rows.push(&["ATIVIDADES", "NA"]);
        rows.push(&["a|b|Obras |", "x"]);
        let frame = frame_from_grid(&grid(&rows), HEADER_ROW);
        assert_eq!(frame.columns, vec!["ATIVIDADES", "NA"]);
    }

    #[test]
    fn test_frame_drops_rows_with_missing_markers() {
        let mut rows = preamble();
        rows.push(&["CIDADE", "ATIVIDADES", "OBSERVACAO OBRA SERVICO"]);
        rows.push(&["Betim", "a|b|Obras civis |", "N/A"]);
        rows.push(&["Contagem", "a|b|Obras civis |", "NA"]);
        rows.push(&["Sabará", "a|b|Caldeiras |", "vistoriado"]);
        let frame = frame_from_grid(&grid(&rows), HEADER_ROW);

        assert_eq!(frame.rows.len(), 1);
        assert_eq!(frame.rows[0][0], "Sabará");
    }

    #[test]
    fn test_frame_keeps_marker_only_column_out() {
        let mut rows = preamble();
        rows.push(&["ATIVIDADES", ""]);
        rows.push(&["a|b|Obras |", "NULL"]);
        let frame = frame_from_grid(&grid(&rows), HEADER_ROW);

        // An unlabelled column holding only markers is not populated
        assert_eq!(frame.columns, vec!["ATIVIDADES"]);
        assert_eq!(frame.rows.len(), 1);
    }

    #[test]
    fn test_frame_names_unlabelled_and_repeated_columns() {
        let mut rows = preamble();
        rows.push(&["ATIVIDADES", "", "ATIVIDADES", ""]);
        rows.push(&["x", "y", "z"]);
        let frame = frame_from_grid(&grid(&rows), HEADER_ROW);

        // Column 3 has no label and no data
        assert_eq!(frame.columns, vec!["ATIVIDADES", "Unnamed: 1", "ATIVIDADES.1"]);
        assert_eq!(frame.rows, vec![vec!["x", "y", "z"]]);
    }

    #[test]
    fn test_frame_without_header_row_is_empty() {
        let frame = frame_from_grid(&grid(&[&["only"]]), HEADER_ROW);
        assert!(frame.columns.is_empty());
        assert!(frame.rows.is_empty());
    }

    #[test]
    fn test_standard_dataset_cuts_activities() {
        let mut rows = preamble();
        rows.push(&["CIDADE", "DATA REGISTRO", "TITULOS", "ATIVIDADES", "OBSERVACAO OBRA SERVICO"]);
        rows.push(&["Uberaba", "2024-01-10", "Eng. Eletricista", "ART|Exec|Subestações |", "-"]);
        rows.push(&["Uberaba", "2024-01-11", "Eng. Eletricista", "sem segmentos", "-"]);
        let dataset = dataset_from_grid(2024, "2024", &grid(&rows)).expect("dataset");

        assert_eq!(dataset.records.len(), 2);
        let first = &dataset.records[0];
        assert_eq!(first.city.as_deref(), Some("Uberaba"));
        assert_eq!(first.notes.as_deref(), Some("-"));
        assert_eq!(first.activity.as_deref(), Some("Subestações"));
        assert_eq!(dataset.records[1].activity, None);
        assert_eq!(dataset.unclassified_count(), 1);
    }

    #[test]
    fn test_shifted_dataset_realigns_columns() {
        let mut rows = preamble();
        rows.push(&[
            "CIDADE",
            "DATA REGISTRO",
            "TITULOS",
            "ATIVIDADES",
            "OBSERVACAO OBRA SERVICO",
            "",
            "",
        ]);
        rows.push(&["1", "Juiz de Fora", "2023-05-02", "Eng. Civil", "x|y|Fundações |", "extra", "vistoriado"]);
        let dataset = dataset_from_grid(2023, "2023", &grid(&rows)).expect("dataset");

        let record = &dataset.records[0];
        assert_eq!(record.city.as_deref(), Some("Juiz de Fora"));
        assert_eq!(record.registered_on.as_deref(), Some("2023-05-02"));
        assert_eq!(record.titles.as_deref(), Some("Eng. Civil"));
        assert_eq!(record.activities, "x|y|Fundações |");
        assert_eq!(record.notes.as_deref(), Some("vistoriado"));
        assert_eq!(record.activity.as_deref(), Some("Fundações"));
    }

    #[test]
    fn test_missing_activities_column_is_an_error() {
        let mut rows = preamble();
        rows.push(&["CIDADE", "TITULOS"]);
        rows.push(&["Ipatinga", "Eng. Civil"]);
        let err = dataset_from_grid(2022, "2022", &grid(&rows)).unwrap_err();
        assert!(format!("{err:#}").contains("ATIVIDADES"));
    }

    #[test]
    fn test_sheet_grid_keeps_absolute_coordinates() {
        let mut range = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("CIDADE".into()));
        range.set_value((3, 2), Data::Int(7));
        let grid = sheet_grid(&range);

        assert_eq!(grid.len(), 4);
        assert!(grid[0].is_empty());
        assert!(grid[1].is_empty());
        assert_eq!(grid[2], vec![None, Some("CIDADE".to_string()), None]);
        assert_eq!(grid[3], vec![None, None, Some("7".to_string())]);
    }

    #[test]
    fn test_sheet_grid_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(sheet_grid(&range).is_empty());
    }

    #[test]
    fn test_dataset_from_offset_range() {
        // Table starts at B8 (header) like a sheet with a blank first column
        let header = ["CIDADE", "DATA REGISTRO", "TITULOS", "ATIVIDADES", "OBSERVACAO OBRA SERVICO"];
        let data = ["Ouro Preto", "2022-07-04", "Eng. Civil", "ART|Exec|Obras civis |", "ok"];
        let mut range = Range::new((HEADER_ROW as u32, 1), (HEADER_ROW as u32 + 2, 5));
        for (i, label) in header.iter().enumerate() {
            range.set_value((HEADER_ROW as u32, 1 + i as u32), Data::String(label.to_string()));
            range.set_value((HEADER_ROW as u32 + 1, 1 + i as u32), Data::String(data[i].to_string()));
        }
        let row = HEADER_ROW as u32 + 2;
        range.set_value((row, 1), Data::String("Mariana".into()));
        range.set_value((row, 2), Data::Float(44_927.0));
        range.set_value((row, 3), Data::String("Eng. Civil".into()));
        range.set_value((row, 4), Data::String("ART|Exec|Caldeiras |".into()));
        range.set_value((row, 5), Data::String("#N/A".into()));

        let dataset = dataset_from_grid(2022, "2022", &sheet_grid(&range)).expect("dataset");

        assert_eq!(dataset.records.len(), 1);
        let record = &dataset.records[0];
        assert_eq!(record.city.as_deref(), Some("Ouro Preto"));
        assert_eq!(record.activity.as_deref(), Some("Obras civis"));
    }

    #[test]
    fn test_load_workbook_missing_file_errors() {
        let err = load_workbook(Path::new("/nonexistent/planilha.xlsx")).unwrap_err();
        assert!(err.to_string().contains("planilha.xlsx"));
    }
}
