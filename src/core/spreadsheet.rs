//! Spreadsheet reading and writing for member import/export.
//!
//! Uploads are Excel workbooks (`.xlsx`, `.xls`) or CSV files. The first sheet
//! row is the header; every following row becomes a [`RawRow`] of loosely
//! typed [`Cell`]s in the fixed import column order, tagged with its sheet row
//! number. Exports and the import template are written as `.xlsx`.

use crate::{
    core::member::MemberDetails,
    errors::{Error, Result},
};
use calamine::{Data, Reader};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::Cursor;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

static EMPTY_CELL: Cell = Cell::Empty;

/// Content type of the workbooks this module writes.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const EXPORT_SHEET_NAME: &str = "회원 목록";
const TEMPLATE_SHEET_NAME: &str = "회원 양식";

/// Header row of the member import template, in column order.
pub const IMPORT_HEADERS: [&str; 8] = [
    "이름",
    "성별",
    "전화번호",
    "상품명",
    "접수일",
    "시작일",
    "종료일",
    "잔여 횟수",
];

/// Header row of the member export.
pub const EXPORT_HEADERS: [&str; 10] = [
    "ID",
    "이름",
    "성별",
    "전화번호",
    "회원권 유형",
    "등록 개월",
    "등록일",
    "시작일",
    "종료일",
    "잔여 횟수",
];

/// Column positions of an import row
pub mod column {
    /// Member name
    pub const NAME: usize = 0;
    /// Gender label
    pub const GENDER: usize = 1;
    /// Phone number
    pub const PHONE: usize = 2;
    /// Product name
    pub const PRODUCT: usize = 3;
    /// Registration date
    pub const REG_DATE: usize = 4;
    /// Start date
    pub const START_DATE: usize = 5;
    /// End date
    pub const END_DATE: usize = 6;
    /// Remaining session count
    pub const REMAINING: usize = 7;
}

/// A single loosely typed spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value
    Empty,
    /// Text exactly as entered
    Text(String),
    /// Numeric value
    Number(f64),
    /// Native date value
    Date(NaiveDate),
}

impl Cell {
    fn from_csv_field(field: &str) -> Self {
        if field.is_empty() {
            Self::Empty
        } else {
            Self::Text(field.to_string())
        }
    }

    fn from_workbook(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(text) => Self::Text(text.clone()),
            Data::Float(n) => Self::Number(*n),
            #[allow(clippy::cast_precision_loss)]
            Data::Int(n) => Self::Number(*n as f64),
            Data::Bool(b) => Self::Text(b.to_string()),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map_or_else(|| Self::Number(dt.as_f64()), |dt| Self::Date(dt.date())),
            Data::DateTimeIso(text) => text
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .map_or_else(|| Self::Text(text.clone()), Self::Date),
            Data::DurationIso(text) => Self::Text(text.clone()),
            Data::Error(err) => Self::Text(err.to_string()),
        }
    }

    /// True for empty cells and whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }

    /// Renders the cell as trimmed text, `None` when blank.
    ///
    /// Whole numbers render without a fractional part so phone numbers and
    /// counts typed as numbers survive the conversion.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(format!("{n:.0}")),
            Self::Number(n) => Some(n.to_string()),
            Self::Date(date) => Some(date.to_string()),
        }
    }
}

/// One data row of an uploaded sheet
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    number: usize,
    cells: Vec<Cell>,
}

impl RawRow {
    /// Wraps the cells of sheet row `number` (1-based, header is row 1).
    #[must_use]
    pub const fn new(number: usize, cells: Vec<Cell>) -> Self {
        Self { number, cells }
    }

    /// 1-based row number in the uploaded sheet.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// The cell at `index`, or [`Cell::Empty`] for short rows.
    #[must_use]
    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    /// True when every cell is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

/// Upload formats, told apart by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Excel workbook, `.xlsx` or legacy `.xls`
    Workbook,
    /// Comma separated values, UTF-8 with an optional BOM
    Csv,
}

impl SheetFormat {
    /// Picks the format from an uploaded file name, `None` if unsupported.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Some(Self::Workbook)
        } else if lower.ends_with(".csv") {
            Some(Self::Csv)
        } else {
            None
        }
    }
}

/// Parses an uploaded sheet into data rows, skipping the header row.
///
/// Rows may be shorter or longer than the header. Every row keeps its sheet
/// row number, so blank rows and empty lines never shift the numbering of the
/// rows after them.
///
/// # Errors
/// Returns [`Error::Spreadsheet`] if the data cannot be read as `format`.
pub fn read_member_rows(format: SheetFormat, data: &[u8]) -> Result<Vec<RawRow>> {
    match format {
        SheetFormat::Workbook => read_workbook_rows(data),
        SheetFormat::Csv => read_csv_rows(data),
    }
}

/// Reads the first worksheet. Row 1 of the sheet is the header.
fn read_workbook_rows(data: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Spreadsheet {
            message: "The workbook has no worksheets".to_string(),
        })??;

    // The used range can start below row 1 or right of column A
    let (first_row, first_col) = range
        .start()
        .map_or((0, 0), |(row, col)| (row as usize, col as usize));

    let mut rows = Vec::new();
    for (offset, cells) in range.rows().enumerate() {
        let index = first_row + offset;
        if index == 0 {
            continue;
        }
        let cells = std::iter::repeat_n(Cell::Empty, first_col)
            .chain(cells.iter().map(Cell::from_workbook))
            .collect();
        rows.push(RawRow::new(index + 1, cells));
    }
    Ok(rows)
}

/// Reads CSV records. Row numbers are source line numbers, so fully empty
/// lines, which the reader drops, still count.
fn read_csv_rows(data: &[u8]) -> Result<Vec<RawRow>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    reader.headers()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .and_then(|pos| usize::try_from(pos.line()).ok())
            .unwrap_or_default();
        rows.push(RawRow::new(
            line,
            record.iter().map(Cell::from_csv_field).collect(),
        ));
    }
    Ok(rows)
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col, title) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *title, &bold)?;
    }
    Ok(())
}

/// Writes members as an export workbook.
///
/// Dates are stored as native Excel dates; blank values leave the cell empty.
///
/// # Errors
/// Returns [`Error::SpreadsheetWrite`] if the workbook cannot be produced.
pub fn write_member_export(members: &[MemberDetails]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;
    write_header(sheet, &EXPORT_HEADERS)?;

    for (row, member) in (1u32..).zip(members) {
        sheet.write_string(row, 0, &member.id)?;
        sheet.write_string(row, 1, &member.name)?;
        if let Some(gender) = member.gender.as_deref() {
            sheet.write_string(row, 2, gender)?;
        }
        if let Some(phone) = member.phone.as_deref() {
            sheet.write_string(row, 3, phone)?;
        }
        sheet.write_string(row, 4, member.product_name.as_deref().unwrap_or("Unknown"))?;
        if let Some(months) = member.reg_months {
            sheet.write_number(row, 5, months)?;
        }
        for (col, date) in [(6, member.reg_date), (7, member.start_date), (8, member.end_date)] {
            if let Some(date) = date {
                sheet.write_datetime_with_format(row, col, &date, &date_format)?;
            }
        }
        sheet.write_number(row, 9, member.remaining)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Writes the blank import template with two sample rows.
///
/// # Errors
/// Returns [`Error::SpreadsheetWrite`] if the workbook cannot be produced.
pub fn write_import_template() -> Result<Vec<u8>> {
    const SAMPLES: [([&str; 7], i32); 2] = [
        (
            [
                "홍길동",
                "남",
                "010-1234-5678",
                "FPT 12개월",
                "2026-01-15",
                "2026-01-15",
                "2027-01-15",
            ],
            100,
        ),
        (
            [
                "김영희",
                "여",
                "010-2345-6789",
                "FPT 6개월",
                "2026-01-15",
                "2026-01-15",
                "2026-07-15",
            ],
            50,
        ),
    ];

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(TEMPLATE_SHEET_NAME)?;
    write_header(sheet, &IMPORT_HEADERS)?;

    for (row, (texts, remaining)) in (1u32..).zip(SAMPLES) {
        for (col, text) in (0u16..).zip(texts) {
            sheet.write_string(row, col, text)?;
        }
        sheet.write_number(row, 7, remaining)?;
    }

    Ok(workbook.save_to_buffer()?)
}
