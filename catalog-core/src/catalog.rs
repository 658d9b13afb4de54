use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<String>,
    pub genre: Option<String>,
    pub theme: Option<String>,
    #[serde(default)]
    pub display: bool,
    #[serde(rename = "artist_ID")]
    pub artist_id: Option<String>,
    #[serde(rename = "gallery_ID")]
    pub gallery_id: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl Artifact {
    /// Id in the string form the favorites API uses.
    pub fn art_id(&self) -> String {
        self.id.to_string()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Artifact")
    }
}

fn sample(
    id: i64,
    name: &str,
    age: &str,
    genre: &str,
    theme: &str,
    display: bool,
    image: &str,
) -> Artifact {
    Artifact {
        id,
        name: Some(name.to_string()),
        age: Some(age.to_string()),
        genre: Some(genre.to_string()),
        theme: Some(theme.to_string()),
        display,
        artist_id: Some(format!("ART{id:03}")),
        gallery_id: Some(format!("GAL{id:03}")),
        image_url: Some(format!("https://images.unsplash.com/{image}?w=400")),
    }
}

/// Built-in collection shown until the backend exposes an artifact listing.
pub fn sample_artifacts() -> Vec<Artifact> {
    vec![
        sample(
            1,
            "Ancient Vase",
            "3000 BC",
            "Pottery",
            "Ancient Civilization",
            true,
            "photo-1578662996442-48f60103fc96",
        ),
        sample(
            2,
            "Bronze Statue",
            "500 BC",
            "Sculpture",
            "Classical Art",
            true,
            "photo-1579783902614-a3fb3927b6a5",
        ),
        sample(
            3,
            "Medieval Manuscript",
            "1200 AD",
            "Manuscript",
            "Medieval Period",
            true,
            "photo-1481627834876-b7833e8f5570",
        ),
        sample(
            4,
            "Renaissance Painting",
            "1500 AD",
            "Painting",
            "Renaissance",
            true,
            "photo-1541961017774-22349e4a1262",
        ),
        sample(
            5,
            "Ancient Coin Collection",
            "200 BC",
            "Numismatics",
            "Ancient Currency",
            false,
            "photo-1614728894747-a83421e2b9c9",
        ),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactFilter {
    /// Case-insensitive substring of the name.
    pub query: Option<String>,
    pub genre: Option<String>,
    pub theme: Option<String>,
    pub displayed_only: bool,
}

fn same_text(field: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => field.is_some_and(|f| f.eq_ignore_ascii_case(wanted)),
    }
}

impl ArtifactFilter {
    pub fn matches(&self, artifact: &Artifact) -> bool {
        if self.displayed_only && !artifact.display {
            return false;
        }
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let hit = artifact
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        same_text(artifact.genre.as_deref(), self.genre.as_deref())
            && same_text(artifact.theme.as_deref(), self.theme.as_deref())
    }

    pub fn apply<'a>(&self, artifacts: &'a [Artifact]) -> Vec<&'a Artifact> {
        artifacts.iter().filter(|a| self.matches(a)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based.
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.total_pages
    }
}

/// Slices `items` into the 1-based `page`. Pages outside `1..=total_pages` clamp.
/// An empty list has zero pages and page 1 is empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());
    Page {
        items: &items[start..end],
        page,
        total_pages,
    }
}
