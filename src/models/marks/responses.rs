use serde::Serialize;
use ts_rs::TS;

use crate::models::marks::entities::Mark;
use crate::models::reports::entities::LetterGrade;

#[derive(Debug, Serialize, TS)]
pub struct MarkResponse {
    #[serde(flatten)]
    pub mark: Mark,
    pub grade: LetterGrade,
}

impl From<Mark> for MarkResponse {
    fn from(mark: Mark) -> Self {
        let grade = LetterGrade::from_score(mark.score);
        Self { mark, grade }
    }
}

#[derive(Debug, Serialize, TS)]
pub struct MarkListResponse {
    pub items: Vec<MarkResponse>,
}
