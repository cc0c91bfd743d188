//! Row mapping between the database and the domain model.

use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use lectern_model::{CatalogEntry, CatalogRecord, Locator, PackageFlags, PackageId, PackageState};
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct RecordRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    /// JSON array of ISO 639 codes.
    pub(crate) languages: String,
    pub(crate) category: String,
    pub(crate) flavor: Option<String>,
    pub(crate) created_at: i64,
    pub(crate) size: i64,
    pub(crate) article_count: i64,
    pub(crate) media_count: i64,
    pub(crate) creator: String,
    pub(crate) publisher: String,
    pub(crate) download_url: Option<String>,
    pub(crate) favicon_url: Option<String>,
    pub(crate) favicon_data: Option<Vec<u8>>,
    pub(crate) has_details: bool,
    pub(crate) has_pictures: bool,
    pub(crate) has_videos: bool,
    pub(crate) requires_external_runtime: bool,
    pub(crate) state: String,
    pub(crate) locator: Option<String>,
}

impl TryFrom<&CatalogRecord> for RecordRow {
    type Error = Error;
    fn try_from(record: &CatalogRecord) -> Result<Self, Self::Error> {
        let entry = &record.entry;
        Ok(Self {
            id: entry.id.as_str().to_string(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            languages: serde_json::to_string(&entry.languages).or_raise(|| ErrorKind::InvalidData("languages"))?,
            category: entry.category.clone(),
            flavor: entry.flavor.clone(),
            created_at: entry.created_at.unix_timestamp(),
            size: i64::try_from(entry.size).or_raise(|| ErrorKind::InvalidData("size"))?,
            article_count: i64::try_from(entry.article_count).or_raise(|| ErrorKind::InvalidData("article count"))?,
            media_count: i64::try_from(entry.media_count).or_raise(|| ErrorKind::InvalidData("media count"))?,
            creator: entry.creator.clone(),
            publisher: entry.publisher.clone(),
            download_url: entry.download_url.clone(),
            favicon_url: entry.favicon_url.clone(),
            favicon_data: entry.favicon_data.clone(),
            has_details: entry.flags.has_details,
            has_pictures: entry.flags.has_pictures,
            has_videos: entry.flags.has_videos,
            requires_external_runtime: entry.flags.requires_external_runtime,
            state: record.state.to_string(),
            locator: record.locator.as_ref().map(|l| l.as_str().to_string()),
        })
    }
}

impl TryFrom<RecordRow> for CatalogRecord {
    type Error = Error;
    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let entry = CatalogEntry {
            id: PackageId::from(row.id),
            title: row.title,
            description: row.description,
            languages: serde_json::from_str(&row.languages).or_raise(|| ErrorKind::InvalidData("languages"))?,
            category: row.category,
            flavor: row.flavor,
            created_at: UtcDateTime::from_unix_timestamp(row.created_at)
                .or_raise(|| ErrorKind::InvalidData("creation date"))?,
            size: u64::try_from(row.size).or_raise(|| ErrorKind::InvalidData("size"))?,
            article_count: u64::try_from(row.article_count).or_raise(|| ErrorKind::InvalidData("article count"))?,
            media_count: u64::try_from(row.media_count).or_raise(|| ErrorKind::InvalidData("media count"))?,
            creator: row.creator,
            publisher: row.publisher,
            download_url: row.download_url,
            favicon_url: row.favicon_url,
            favicon_data: row.favicon_data,
            flags: PackageFlags {
                has_details: row.has_details,
                has_pictures: row.has_pictures,
                has_videos: row.has_videos,
                requires_external_runtime: row.requires_external_runtime,
            },
        };
        Ok(Self {
            entry,
            state: row.state.parse::<PackageState>().or_raise(|| ErrorKind::InvalidData("state"))?,
            locator: row.locator.map(Locator::from),
        })
    }
}
