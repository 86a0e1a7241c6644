//! Records as the Inkarr REST API returns them.
//!
//! Only identifiers are required. Everything else defaults when absent so a
//! sparse server response still decodes.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDto {
    pub id: i64,
    #[serde(default)]
    pub foreign_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub sort_title: Option<String>,
    #[serde(default)]
    pub clean_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(rename = "_count", default)]
    pub count: Option<SeriesCountDto>,
    #[serde(default)]
    pub volumes: Option<Vec<VolumeDto>>,
    #[serde(default)]
    pub chapters: Option<Vec<ChapterDto>>,
    #[serde(default)]
    pub creators: Option<Vec<SeriesCreatorDto>>,
    #[serde(default)]
    pub media_files: Option<Vec<MediaFileDto>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monitored: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCountDto {
    #[serde(default, deserialize_with = "null_as_default")]
    pub volumes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_files: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDto {
    pub id: i64,
    pub series_id: i64,
    #[serde(default)]
    pub volume_number: Option<f32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monitored: bool,
    #[serde(default)]
    pub chapters: Option<Vec<ChapterDto>>,
    #[serde(default)]
    pub media_files: Option<Vec<MediaFileDto>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDto {
    pub id: i64,
    pub series_id: i64,
    #[serde(default)]
    pub volume_id: Option<i64>,
    #[serde(default)]
    pub chapter_number: Option<f32>,
    #[serde(default)]
    pub issue_number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monitored: bool,
    #[serde(default)]
    pub media_files: Option<Vec<MediaFileDto>>,
    #[serde(default)]
    pub volume: Option<VolumeRefDto>,
    #[serde(default)]
    pub series: Option<SeriesRefDto>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRefDto {
    pub id: i64,
    #[serde(default)]
    pub volume_number: Option<f32>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesRefDto {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRefDto {
    pub id: i64,
    #[serde(default)]
    pub chapter_number: Option<f32>,
}

/// A CBZ/CBR (or similar) archive on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFileDto {
    pub id: i64,
    #[serde(default)]
    pub series_id: Option<i64>,
    #[serde(default)]
    pub volume_id: Option<i64>,
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub page_count: Option<i32>,
    #[serde(default)]
    pub series: Option<SeriesRefDto>,
    #[serde(default)]
    pub volume: Option<VolumeRefDto>,
    #[serde(default)]
    pub chapter: Option<ChapterRefDto>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Join record between a series and a creator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesCreatorDto {
    pub id: Option<i64>,
    pub series_id: Option<i64>,
    pub creator_id: Option<i64>,
    pub role: Option<String>,
    pub creator: Option<CreatorDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorDto {
    pub id: i64,
    #[serde(default)]
    pub foreign_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<CreatorMetadataDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorMetadataDto {
    pub name: Option<String>,
    pub role: Option<String>,
    pub biography: Option<String>,
    pub image_url: Option<String>,
}

// Explicit JSON nulls decode like missing fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_series_decodes_with_defaults() {
        let s: SeriesDto = serde_json::from_str(r#"{"id": 7, "title": "Saga"}"#).unwrap();
        assert_eq!(s.id, 7);
        assert_eq!(s.title, "Saga");
        assert!(s.chapters.is_none());
        assert!(s.count.is_none());
        assert!(!s.monitored);
    }

    #[test]
    fn nulls_decode_as_defaults() {
        let s: SeriesDto = serde_json::from_str(
            r#"{"id": 2, "title": null, "monitored": null, "_count": {"volumes": null, "chapters": 4}}"#,
        )
        .unwrap();
        assert_eq!(s.title, "");
        assert_eq!(s.count.unwrap().chapters, 4);
        assert_eq!(s.count.unwrap().volumes, 0);
        assert_eq!(s.count.unwrap().media_files, 0);
    }

    #[test]
    fn series_reads_count_and_nested_records() {
        let body = r#"{
            "id": 1,
            "title": "Moonlight Saga",
            "sortTitle": "moonlight saga",
            "_count": {"volumes": 2, "chapters": 10, "mediaFiles": 12},
            "creators": [{"role": "Writer", "creator": {"id": 3, "metadata": {"name": "A. Writer"}}}],
            "mediaFiles": [{"id": 9, "path": "/lib/a.cbz", "pageCount": 24}],
            "chapters": [{"id": 5, "seriesId": 1, "chapterNumber": 1.5, "unknownField": true}]
        }"#;
        let s: SeriesDto = serde_json::from_str(body).unwrap();
        assert_eq!(s.count, Some(SeriesCountDto { volumes: 2, chapters: 10, media_files: 12 }));
        assert_eq!(s.sort_title.as_deref(), Some("moonlight saga"));
        let creators = s.creators.unwrap();
        assert_eq!(creators[0].role.as_deref(), Some("Writer"));
        assert_eq!(creators[0].creator.as_ref().unwrap().id, 3);
        assert_eq!(s.media_files.unwrap()[0].page_count, Some(24));
        assert_eq!(s.chapters.unwrap()[0].chapter_number, Some(1.5));
    }

    #[test]
    fn records_require_identifiers() {
        assert!(serde_json::from_str::<SeriesDto>(r#"{"title": "x"}"#).is_err());
        assert!(serde_json::from_str::<ChapterDto>(r#"{"title": "x"}"#).is_err());
        assert!(serde_json::from_str::<MediaFileDto>(r#"{"path": "/a.cbz"}"#).is_err());
    }
}
