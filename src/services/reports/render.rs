//! 报表导出为 XLSX
//!
//! 每个排版行对应一行单元格，排版分页处插入分页符，表头在每一页重复。

use rust_xlsxwriter::{
    Color, ConditionalFormatDataBar, ConditionalFormatType, Format, FormatAlign, Workbook, Worksheet,
};

use crate::errors::Result;
use crate::models::reports::entities::{ReportDocument, ReportLine, ReportRow};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 1;
const FIRST_LINE_ROW: u32 = 2;
const COLUMNS: [(&str, f64); 6] = [
    ("Student", 28.0),
    ("Class", 10.0),
    ("Section", 10.0),
    ("Score", 8.0),
    ("Grade", 8.0),
    ("Performance", 24.0),
];
const LAST_COL: u16 = COLUMNS.len() as u16 - 1;

struct Formats {
    title: Format,
    header: Format,
    group: Format,
    percent: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold().set_font_size(14),
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xE0E0E0)),
            group: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xF5F5F5)),
            percent: Format::new().set_num_format("0%"),
        }
    }
}

/// 渲染为 XLSX 字节
pub fn render_xlsx(document: &ReportDocument) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    let sheet = workbook.add_worksheet().set_name("Marks")?;
    write_header(sheet, &formats, document)?;

    let mut row_index = FIRST_LINE_ROW;
    let mut breaks = Vec::new();
    for (page_index, page) in document.pages.iter().enumerate() {
        if page_index > 0 {
            breaks.push(row_index);
        }
        for line in &page.lines {
            match line {
                ReportLine::GroupHeader { title, .. } => {
                    sheet.merge_range(row_index, 0, row_index, LAST_COL, title, &formats.group)?;
                }
                ReportLine::Row { row, .. } => write_row(sheet, &formats, row_index, row)?,
            }
            row_index += 1;
        }
    }

    if !breaks.is_empty() {
        sheet.set_page_breaks(&breaks)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_header(sheet: &mut Worksheet, formats: &Formats, document: &ReportDocument) -> Result<()> {
    let title = format!(
        "{} ({})",
        document.title,
        document.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    sheet.merge_range(TITLE_ROW, 0, TITLE_ROW, LAST_COL, &title, &formats.title)?;

    for (col, (name, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(HEADER_ROW, col, *name, &formats.header)?;
        sheet.set_column_width(col, *width)?;
    }
    sheet.set_repeat_rows(HEADER_ROW, HEADER_ROW)?;
    Ok(())
}

fn write_row(sheet: &mut Worksheet, formats: &Formats, row_index: u32, row: &ReportRow) -> Result<()> {
    let color = Color::RGB(row.grade.bar_color());
    let grade_format = Format::new()
        .set_bold()
        .set_font_color(color)
        .set_align(FormatAlign::Center);

    sheet.write_string(row_index, 0, &row.student_name)?;
    sheet.write_string(row_index, 1, &row.class_name)?;
    sheet.write_string(row_index, 2, &row.section)?;
    sheet.write_number(row_index, 3, row.score)?;
    sheet.write_string_with_format(row_index, 4, row.grade.as_str(), &grade_format)?;
    sheet.write_number_with_format(row_index, LAST_COL, row.performance, &formats.percent)?;

    let bar = ConditionalFormatDataBar::new()
        .set_minimum(ConditionalFormatType::Number, 0)
        .set_maximum(ConditionalFormatType::Number, 1)
        .set_fill_color(color);
    sheet.add_conditional_format(row_index, LAST_COL, row_index, LAST_COL, &bar)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reports::aggregator::generate;
    use crate::models::marks::entities::Mark;

    fn marks(count: i64) -> Vec<Mark> {
        let now = chrono::Utc::now();
        (0..count)
            .map(|i| Mark {
                id: i,
                submission_id: i,
                student_name: format!("Student {i}"),
                class_name: "10th".to_string(),
                section: if i % 2 == 0 { "A" } else { "B" }.to_string(),
                score: (i * 7 % 101) as i32,
                graded_by: None,
                created_at: now,
                updated_at: now,
            })
            .collect()
    }

    #[test]
    fn test_renders_workbook() {
        let document = generate(&marks(3), "Student Marks Report").unwrap();
        let bytes = render_xlsx(&document).unwrap();
        // XLSX 是 zip 容器
        assert!(bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]));
    }

    #[test]
    fn test_renders_multi_page_workbook() {
        let document = generate(&marks(80), "Student Marks Report").unwrap();
        assert!(document.pages.len() > 1);
        assert!(!render_xlsx(&document).unwrap().is_empty());
    }
}
