//! 评分实体

use sea_orm::entity::prelude::*;

use crate::errors::PortalError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub submission_id: i64,
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    pub score: i32,
    pub graded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型，分数越界的行视为损坏数据
impl Model {
    pub fn try_into_mark(self) -> crate::errors::Result<crate::models::marks::entities::Mark> {
        use crate::models::marks::entities::{MAX_SCORE, MIN_SCORE, Mark};
        use chrono::{DateTime, Utc};

        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(PortalError::serialization(format!(
                "评分记录 {} 的分数 {} 超出范围",
                self.id, self.score
            )));
        }

        Ok(Mark {
            id: self.id,
            submission_id: self.submission_id,
            student_name: self.student_name,
            class_name: self.class_name,
            section: self.section,
            score: self.score,
            graded_by: self.graded_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(score: i32) -> Model {
        Model {
            id: 7,
            submission_id: 3,
            student_name: "Asha".to_string(),
            class_name: "10th".to_string(),
            section: "A".to_string(),
            score,
            graded_by: Some(1),
            created_at: 1_700_000_000,
            updated_at: 1_700_000_100,
        }
    }

    #[test]
    fn test_try_into_mark() {
        let mark = model(85).try_into_mark().unwrap();
        assert_eq!(mark.score, 85);
        assert_eq!(mark.submission_id, 3);
        assert_eq!(mark.updated_at.timestamp(), 1_700_000_100);

        assert!(matches!(
            model(101).try_into_mark(),
            Err(PortalError::Serialization(_))
        ));
    }
}
