//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    pub file_name: String,
    pub extension: String,
    #[sea_orm(unique)]
    pub storage_key: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::marks::Entity")]
    Mark,
}

impl Related<super::marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mark.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::Submission;
        use chrono::{DateTime, Utc};

        Submission {
            id: self.id,
            student_name: self.student_name,
            class_name: self.class_name,
            section: self.section,
            file_name: self.file_name,
            extension: self.extension.to_lowercase(),
            storage_key: self.storage_key,
            file_size: self.file_size,
            mime_type: self.mime_type,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
