use std::fmt;

use chrono::NaiveDateTime;
use plugin_interface::{Chapter, Manga, MangaStatus, Page};
use tracing::warn;

use crate::dto::{ChapterDto, MediaFileDto, SeriesCreatorDto, SeriesDto};

pub const SERIES_PATH: &str = "/api/v1/series";
pub const CHAPTER_PATH: &str = "/api/v1/chapter";
pub const MEDIA_FILE_PATH: &str = "/api/v1/mediafile";

/// Index stride between media files of one chapter.
pub const FILE_INDEX_STRIDE: u32 = 1000;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const AUTHOR_ROLES: &[&str] = &["writer", "author", "story"];
const ARTIST_ROLES: &[&str] = &["artist", "penciller", "illustrator", "art"];

// --- synthetic urls ---

pub fn series_url(id: i64) -> String {
    format!("{SERIES_PATH}/{id}")
}

pub fn series_id_from_url(url: &str) -> Option<i64> {
    url.strip_prefix(SERIES_PATH)?.strip_prefix('/')?.parse().ok()
}

pub fn cover_url(base_url: &str, series_id: i64) -> String {
    format!("{base_url}{SERIES_PATH}/{series_id}/cover")
}

pub fn page_image_url(base_url: &str, media_file_id: i64, page_number: u32) -> String {
    format!("{base_url}{MEDIA_FILE_PATH}/{media_file_id}/page/{page_number}")
}

/// What a host chapter points at. Decided when the chapter list is built and
/// carried in the chapter url, so page listing knows which record to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef {
    Chapter(i64),
    MediaFile(i64),
}

impl ResourceRef {
    pub fn from_url(url: &str) -> Option<Self> {
        let id_after = |prefix: &str| -> Option<i64> {
            url.strip_prefix(prefix)?.strip_prefix('/')?.parse().ok()
        };
        if let Some(id) = id_after(CHAPTER_PATH) {
            return Some(Self::Chapter(id));
        }
        id_after(MEDIA_FILE_PATH).map(Self::MediaFile)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chapter(id) => write!(f, "{CHAPTER_PATH}/{id}"),
            Self::MediaFile(id) => write!(f, "{MEDIA_FILE_PATH}/{id}"),
        }
    }
}

// --- series -> manga ---

pub fn manga_from_series(series: &SeriesDto, base_url: &str) -> Manga {
    Manga {
        url: series_url(series.id),
        title: series.title.clone(),
        thumbnail_url: Some(
            series
                .image_url
                .clone()
                .unwrap_or_else(|| cover_url(base_url, series.id)),
        ),
        description: build_description(series),
        author: names_for_roles(series.creators.as_deref(), AUTHOR_ROLES),
        artist: names_for_roles(series.creators.as_deref(), ARTIST_ROLES),
        genre: series.genres.as_deref().and_then(format_genres),
        status: parse_status(series.status.as_deref()),
        initialized: true,
    }
}

pub fn build_description(series: &SeriesDto) -> Option<String> {
    let mut sections: Vec<String> = Vec::new();

    if let Some(overview) = series.overview.as_deref().filter(|o| !o.trim().is_empty()) {
        sections.push(overview.to_string());
    }

    let publishing = [
        series.publisher.as_deref().map(|p| format!("Publisher: {p}")),
        series.year.map(|y| format!("Year: {y}")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" | ");
    if !publishing.is_empty() {
        sections.push(publishing);
    }

    if let Some(c) = series.count {
        sections.push(format!(
            "Volumes: {} | Chapters: {} | Files: {}",
            c.volumes, c.chapters, c.media_files
        ));
    }

    (!sections.is_empty()).then(|| sections.join("\n\n"))
}

// The join record's role wins; the creator's own metadata role is the fallback.
// Older clients matched on the metadata role alone, so a series whose join rows
// carry roles the metadata lacks gains author/artist names here.
fn names_for_roles(creators: Option<&[SeriesCreatorDto]>, roles: &[&str]) -> Option<String> {
    let mut names: Vec<&str> = Vec::new();
    for link in creators.unwrap_or_default() {
        let meta = link.creator.as_ref().and_then(|c| c.metadata.as_ref());
        let role = link
            .role
            .as_deref()
            .or_else(|| meta.and_then(|m| m.role.as_deref()));
        let Some(role) = role.map(str::trim) else { continue };
        if !roles.iter().any(|r| role.eq_ignore_ascii_case(r)) {
            continue;
        }
        let name = meta
            .and_then(|m| m.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(name) = name {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    (!names.is_empty()).then(|| names.join(", "))
}

pub fn parse_status(status: Option<&str>) -> MangaStatus {
    let Some(s) = status else { return MangaStatus::Unknown };
    match s.trim().to_lowercase().as_str() {
        "ongoing" | "continuing" => MangaStatus::Ongoing,
        "ended" | "completed" | "complete" => MangaStatus::Completed,
        "hiatus" | "on hiatus" => MangaStatus::OnHiatus,
        "cancelled" | "canceled" => MangaStatus::Cancelled,
        "licensed" => MangaStatus::Licensed,
        _ => MangaStatus::Unknown,
    }
}

fn format_genres(genres: &str) -> Option<String> {
    let joined = genres
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

/// Case-insensitive substring match on title or sort title. A blank query matches everything.
pub fn series_matches(series: &SeriesDto, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    series.title.to_lowercase().contains(&q)
        || series
            .sort_title
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(&q))
}

// --- chapters ---

pub fn chapter_from_dto(chapter: &ChapterDto) -> Chapter {
    Chapter {
        url: ResourceRef::Chapter(chapter.id).to_string(),
        name: chapter_name(chapter),
        chapter_number: chapter.chapter_number.unwrap_or(0.0),
        date_upload: parse_date(
            chapter
                .release_date
                .as_deref()
                .or(chapter.created_at.as_deref()),
        ),
    }
}

pub fn chapter_name(chapter: &ChapterDto) -> String {
    let title = chapter.title.as_deref().filter(|t| !t.trim().is_empty());
    match (title, chapter.chapter_number, chapter.issue_number.as_deref()) {
        (Some(title), Some(n), _) => format!("Chapter {} - {title}", format_number(n)),
        (Some(title), None, _) => title.to_string(),
        (None, Some(n), Some(issue)) => format!("Chapter {} (#{issue})", format_number(n)),
        (None, Some(n), None) => format!("Chapter {}", format_number(n)),
        (None, None, Some(issue)) => format!("Issue #{issue}"),
        (None, None, None) => "Chapter".to_string(),
    }
}

/// Integral values print without a decimal point.
pub fn format_number(n: f32) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One chapter per media file, numbered by position from 1.
pub fn chapter_from_media_file(position: usize, file: &MediaFileDto) -> Chapter {
    let number = position + 1;
    Chapter {
        url: ResourceRef::MediaFile(file.id).to_string(),
        name: file
            .filename
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("File {number}")),
        chapter_number: number as f32,
        date_upload: parse_date(file.created_at.as_deref()),
    }
}

/// Chapter list for a series, newest (highest number) first. Falls back to
/// the series' media files when it has no explicit chapters.
pub fn chapters_from_series(series: &SeriesDto) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = series
        .chapters
        .iter()
        .flatten()
        .map(chapter_from_dto)
        .collect();

    if chapters.is_empty() {
        chapters = series
            .media_files
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, f)| chapter_from_media_file(i, f))
            .collect();
    }

    chapters.sort_by(|a, b| b.chapter_number.total_cmp(&a.chapter_number));
    chapters
}

// --- pages ---

pub fn pages_from_media_file(file: &MediaFileDto, base_url: &str, start_index: u32) -> Vec<Page> {
    let count = file.page_count.unwrap_or(1).max(0) as u32;
    (0..count)
        .map(|i| Page {
            index: start_index + i,
            url: String::new(),
            image_url: Some(page_image_url(base_url, file.id, i + 1)),
        })
        .collect()
}

pub fn pages_from_chapter(chapter: &ChapterDto, base_url: &str) -> Vec<Page> {
    chapter
        .media_files
        .iter()
        .flatten()
        .enumerate()
        .flat_map(|(i, f)| pages_from_media_file(f, base_url, i as u32 * FILE_INDEX_STRIDE))
        .collect()
}

// --- dates ---

/// Milliseconds since the epoch for a `yyyy-MM-ddTHH:mm:ss` UTC timestamp.
/// Trailing text (fractions, zone suffix) is ignored. Absent or unparsable values give 0.
pub fn parse_date(value: Option<&str>) -> i64 {
    let Some(raw) = value else { return 0 };
    match NaiveDateTime::parse_and_remainder(raw.trim(), DATE_FORMAT) {
        Ok((dt, _)) => dt.and_utc().timestamp_millis(),
        Err(e) => {
            warn!(date = raw, error = %e, "failed to parse date");
            0
        }
    }
}
