use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 由分数派生的等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    F,
}

impl LetterGrade {
    /// ≥90 A+，80-89 A，70-79 B，60-69 C，其余 F
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 90 => LetterGrade::APlus,
            s if s >= 80 => LetterGrade::A,
            s if s >= 70 => LetterGrade::B,
            s if s >= 60 => LetterGrade::C,
            _ => LetterGrade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::F => "F",
        }
    }

    /// 表现条颜色（RGB）
    pub fn bar_color(&self) -> u32 {
        match self {
            LetterGrade::APlus => 0x2E7D32, // green
            LetterGrade::A => 0x1565C0,     // blue
            LetterGrade::B => 0xF9A825,     // yellow
            LetterGrade::C => 0xEF6C00,     // orange
            LetterGrade::F => 0xC62828,     // red
        }
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 报表中的一行评分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    pub score: i32,
    pub grade: LetterGrade,
    /// score / 100
    pub performance: f64,
}

/// 布局行：分组标题或数据行，`y` 为该行在页内的起始纵坐标
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportLine {
    GroupHeader { title: String, y: u32 },
    Row { row: ReportRow, y: u32 },
}

impl ReportLine {
    pub fn y(&self) -> u32 {
        match self {
            ReportLine::GroupHeader { y, .. } | ReportLine::Row { y, .. } => *y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPage {
    /// 从 1 开始
    pub number: usize,
    pub lines: Vec<ReportLine>,
}

/// 分页后的评分报表
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// 分组键，按首次出现顺序
    pub groups: Vec<String>,
    pub pages: Vec<ReportPage>,
}

impl ReportDocument {
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.pages.iter().flat_map(|p| p.lines.iter()).filter_map(|l| match l {
            ReportLine::Row { row, .. } => Some(row),
            ReportLine::GroupHeader { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(LetterGrade::from_score(100), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(90), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(89), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(80), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(79), LetterGrade::B);
        assert_eq!(LetterGrade::from_score(70), LetterGrade::B);
        assert_eq!(LetterGrade::from_score(69), LetterGrade::C);
        assert_eq!(LetterGrade::from_score(60), LetterGrade::C);
        assert_eq!(LetterGrade::from_score(59), LetterGrade::F);
        assert_eq!(LetterGrade::from_score(0), LetterGrade::F);
    }

    #[test]
    fn test_grade_serializes_as_label() {
        let json = serde_json::to_string(&LetterGrade::APlus).unwrap();
        assert_eq!(json, "\"A+\"");
        assert_eq!(LetterGrade::F.to_string(), "F");
    }

    #[test]
    fn test_bar_colors_are_distinct() {
        let grades = [
            LetterGrade::APlus,
            LetterGrade::A,
            LetterGrade::B,
            LetterGrade::C,
            LetterGrade::F,
        ];
        let colors: std::collections::HashSet<u32> = grades.iter().map(|g| g.bar_color()).collect();
        assert_eq!(colors.len(), grades.len());
    }
}
