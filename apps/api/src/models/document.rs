use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    Resume,
    CoverLetter,
    Portfolio,
    Certificate,
    Transcript,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::CoverLetter => "cover-letter",
            DocumentType::Portfolio => "portfolio",
            DocumentType::Certificate => "certificate",
            DocumentType::Transcript => "transcript",
            DocumentType::Other => "other",
        }
    }
}

impl FromStr for DocumentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "resume" => DocumentType::Resume,
            "cover-letter" => DocumentType::CoverLetter,
            "portfolio" => DocumentType::Portfolio,
            "certificate" => DocumentType::Certificate,
            "transcript" => DocumentType::Transcript,
            "other" => DocumentType::Other,
            other => bail!("unknown document type '{other}'"),
        })
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub size: i64,
    pub upload_date: DateTime<Utc>,
    pub storage_path: String,
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub name: String,
    pub doc_type: DocumentType,
    pub size: i64,
    pub storage_path: String,
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    pub doc_type: String,
    pub size: i64,
    pub upload_date: DateTime<Utc>,
    pub storage_path: String,
    pub application_id: Option<Uuid>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = anyhow::Error;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            doc_type: row.doc_type.parse()?,
            size: row.size,
            upload_date: row.upload_date,
            storage_path: row.storage_path,
            application_id: row.application_id,
        })
    }
}
