//! 扩展名策略实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "extension_policies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub extension: String,
    pub mime_type: String,
    pub enabled: bool,
    pub updated_at: i64,
    pub updated_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_policy(self) -> crate::models::extensions::entities::ExtensionPolicy {
        use crate::models::extensions::entities::ExtensionPolicy;
        use chrono::{DateTime, Utc};

        ExtensionPolicy {
            id: self.id,
            extension: self.extension.trim_start_matches('.').to_lowercase(),
            mime_type: self.mime_type,
            enabled: self.enabled,
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            updated_by: self.updated_by,
        }
    }
}
