//! 评分报表排版
//!
//! 按 (班级, 分组) 归组，分组顺序即首次出现的顺序，组内保持输入顺序。
//! 纵向游标从页顶开始，每输出一行前检查是否越过阈值，越过则换页。

use chrono::Utc;

use crate::errors::{PortalError, Result};
use crate::models::marks::entities::{MAX_SCORE, Mark};
use crate::models::reports::entities::{LetterGrade, ReportDocument, ReportLine, ReportPage, ReportRow};

pub const PAGE_TOP: u32 = 30;
/// 游标超过该值时换页
pub const PAGE_LIMIT: u32 = 270;
pub const ROW_HEIGHT: u32 = 10;
pub const GROUP_HEADER_HEIGHT: u32 = 10;
/// 分组标题与第一行之间的留白
pub const GROUP_RESERVATION: u32 = 5;

pub fn group_title(class_name: &str, section: &str) -> String {
    format!("Class {class_name} - Section {section}")
}

fn to_row(mark: &Mark) -> ReportRow {
    ReportRow {
        student_name: mark.student_name.clone(),
        class_name: mark.class_name.clone(),
        section: mark.section.clone(),
        score: mark.score,
        grade: LetterGrade::from_score(mark.score),
        performance: f64::from(mark.score) / f64::from(MAX_SCORE),
    }
}

struct Layout {
    pages: Vec<ReportPage>,
    cursor: u32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![ReportPage { number: 1, lines: Vec::new() }],
            cursor: PAGE_TOP,
        }
    }

    fn break_if_full(&mut self) {
        self.break_unless_fits(0);
    }

    /// 游标前进 `advance` 后越过阈值则先换页
    fn break_unless_fits(&mut self, advance: u32) {
        if self.cursor + advance > PAGE_LIMIT {
            let number = self.pages.len() + 1;
            self.pages.push(ReportPage { number, lines: Vec::new() });
            self.cursor = PAGE_TOP;
        }
    }

    fn push(&mut self, line: ReportLine, advance: u32) {
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
        self.cursor += advance;
    }

    // 标题与其第一行必须在同一页
    fn header(&mut self, title: String) {
        self.break_unless_fits(GROUP_HEADER_HEIGHT + GROUP_RESERVATION);
        let y = self.cursor;
        self.push(
            ReportLine::GroupHeader { title, y },
            GROUP_HEADER_HEIGHT + GROUP_RESERVATION,
        );
    }

    fn row(&mut self, row: ReportRow) {
        self.break_if_full();
        let y = self.cursor;
        self.push(ReportLine::Row { row, y }, ROW_HEIGHT);
    }
}

/// 生成分页报表，评分为空时返回 `NothingToExport`
pub fn generate(marks: &[Mark], title: &str) -> Result<ReportDocument> {
    if marks.is_empty() {
        return Err(PortalError::nothing_to_export("There are no marks to export yet"));
    }

    let mut groups: Vec<(String, Vec<ReportRow>)> = Vec::new();
    for mark in marks {
        let key = group_title(&mark.class_name, &mark.section);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, rows)) => rows.push(to_row(mark)),
            None => groups.push((key, vec![to_row(mark)])),
        }
    }

    let mut layout = Layout::new();
    for (title, rows) in &groups {
        layout.header(title.clone());
        for row in rows {
            layout.row(row.clone());
        }
    }

    Ok(ReportDocument {
        title: title.to_string(),
        generated_at: Utc::now(),
        groups: groups.into_iter().map(|(k, _)| k).collect(),
        pages: layout.pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(id: i64, student: &str, class: &str, section: &str, score: i32) -> Mark {
        let now = Utc::now();
        Mark {
            id,
            submission_id: id,
            student_name: student.to_string(),
            class_name: class.to_string(),
            section: section.to_string(),
            score,
            graded_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_is_nothing_to_export() {
        let err = generate(&[], "Report").unwrap_err();
        assert!(matches!(err, PortalError::NothingToExport(_)));
    }

    #[test]
    fn test_groups_keep_first_encountered_order() {
        let marks = vec![
            mark(1, "Ravi", "10th", "B", 75),
            mark(2, "Asha", "9th", "A", 92),
            mark(3, "Meera", "10th", "B", 58),
        ];
        let doc = generate(&marks, "Report").unwrap();

        assert_eq!(doc.groups, vec!["Class 10th - Section B", "Class 9th - Section A"]);
        let names: Vec<_> = doc.rows().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, vec!["Ravi", "Meera", "Asha"]);

        let first = doc.rows().next().unwrap();
        assert_eq!(first.grade, LetterGrade::B);
        assert!((first.performance - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_header_reserves_space_before_first_row() {
        let doc = generate(&[mark(1, "Asha", "10th", "A", 80)], "Report").unwrap();
        let lines = &doc.pages[0].lines;
        assert_eq!(lines[0].y(), PAGE_TOP);
        assert_eq!(lines[1].y(), PAGE_TOP + GROUP_HEADER_HEIGHT + GROUP_RESERVATION);
    }

    #[test]
    fn test_rows_never_start_below_threshold() {
        let marks: Vec<_> = (0..120)
            .map(|i| {
                let section = if i % 3 == 0 { "A" } else { "B" };
                mark(i, &format!("Student {i}"), "10th", section, (i % 101) as i32)
            })
            .collect();
        let doc = generate(&marks, "Report").unwrap();

        assert!(doc.pages.len() > 1);
        for (index, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.number, index + 1);
            assert!(!page.lines.is_empty());
            assert_eq!(page.lines[0].y(), PAGE_TOP);
            for line in &page.lines {
                assert!(line.y() <= PAGE_LIMIT);
            }
            assert!(!matches!(page.lines.last(), Some(ReportLine::GroupHeader { .. })));
        }
        assert_eq!(doc.rows().count(), 120);
    }

    #[test]
    fn test_header_moves_to_next_page_with_its_rows() {
        // 22 行后游标停在 265，下一个标题放不下第一行
        let mut marks: Vec<_> = (0..22)
            .map(|i| mark(i, &format!("Student {i}"), "10th", "A", 70))
            .collect();
        marks.extend((22..25).map(|i| mark(i, &format!("Student {i}"), "10th", "B", 70)));
        let doc = generate(&marks, "Report").unwrap();

        assert_eq!(doc.pages.len(), 2);
        assert!(matches!(doc.pages[0].lines.last(), Some(ReportLine::Row { .. })));
        match &doc.pages[1].lines[0] {
            ReportLine::GroupHeader { title, y } => {
                assert_eq!(title, "Class 10th - Section B");
                assert_eq!(*y, PAGE_TOP);
            }
            other => panic!("expected group header, got {other:?}"),
        }
        assert!(matches!(doc.pages[1].lines[1], ReportLine::Row { .. }));
    }
}
