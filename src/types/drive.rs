use serde::{Deserialize, Serialize};

/// SharePoint site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    pub child_count: Option<i64>,
}

/// Drive item (file or folder) in a document library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub web_url: Option<String>,
    pub size: Option<i64>,
    pub folder: Option<FolderFacet>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

/// Addresses a document either by library path or by drive item id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRef {
    Path(String),
    Id(String),
}

impl DocumentRef {
    /// True when there is no id or path to address
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentRef::Path(path) | DocumentRef::Id(path) => path.is_empty(),
        }
    }

    /// `id:<item-id>` selects by id, anything else is a path
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix("id:") {
            Some(id) => DocumentRef::Id(id.trim().to_string()),
            None => DocumentRef::Path(s.trim_matches('/').to_string()),
        }
    }
}

/// Join an optional folder and a file name into a library path
///
/// `None`, empty and `"root"` folders address the library root.
pub fn library_path(folder: Option<&str>, name: &str) -> String {
    match folder.map(|f| f.trim_matches('/')) {
        Some(f) if !f.is_empty() && f != "root" => format!("{}/{}", f, name.trim_matches('/')),
        _ => name.trim_matches('/').to_string(),
    }
}

/// Percent-encode each segment of a library path
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
