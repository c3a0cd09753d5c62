//! Audit log record entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::LogRecord;
use inkwell_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "log_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub log_file: String,
    #[sea_orm(column_type = "String(StringLen::N(16))")]
    pub info_type: String,
    #[sea_orm(column_type = "String(StringLen::N(512))")]
    pub message: String,
    pub date_and_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain LogRecord. Fails on an unknown level.
impl TryFrom<Model> for LogRecord {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            log_file: model.log_file,
            info_type: model.info_type.parse().map_err(RepoError::Query)?,
            message: model.message,
            date_and_time: model.date_and_time.into(),
        })
    }
}

impl From<LogRecord> for ActiveModel {
    fn from(record: LogRecord) -> Self {
        Self {
            id: Set(record.id),
            log_file: Set(record.log_file),
            info_type: Set(record.info_type.as_str().to_string()),
            message: Set(record.message),
            date_and_time: Set(record.date_and_time.into()),
        }
    }
}
