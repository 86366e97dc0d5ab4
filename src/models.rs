//! Request and response bodies of the Files API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which IPFS network a file is stored on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Publicly retrievable through any gateway.
    Public,
    /// Private, reachable only through signed access.
    #[default]
    Private,
}

impl Network {
    /// The wire name of the network.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Public => "public",
            Network::Private => "private",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileInfo {
    /// Pinata's identifier for the file
    pub id: String,
    /// The display name, if one was given
    #[serde(default)]
    pub name: Option<String>,
    /// The IPFS content identifier
    pub cid: String,
    /// Size in bytes
    pub size: u64,
    /// Number of files behind the CID, more than one for folders
    pub number_of_files: u64,
    /// The detected MIME type
    pub mime_type: String,
    /// The group the file belongs to
    #[serde(default)]
    pub group_id: Option<String>,
    /// Free-form metadata; empty when the server sends `null`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keyvalues: HashMap<String, String>,
    /// When the file was stored
    #[serde(deserialize_with = "crate::dates::deserialize")]
    pub created_at: DateTime<Utc>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The result of an upload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    /// Pinata's identifier for the new file
    pub id: String,
    /// The name the file was uploaded under
    pub name: String,
    /// The IPFS content identifier
    pub cid: String,
    /// Size in bytes
    pub size: u64,
    /// Number of files behind the CID
    pub number_of_files: u64,
    /// The detected MIME type
    pub mime_type: String,
    /// The group the file was added to
    #[serde(default)]
    pub group_id: Option<String>,
    /// The owning account
    #[serde(default)]
    pub user_id: Option<String>,
    /// Set when identical content was already stored.
    #[serde(default)]
    pub is_duplicate: Option<bool>,
    /// When the file was stored
    #[serde(deserialize_with = "crate::dates::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// One page of files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileList {
    /// The files on this page
    pub files: Vec<FileInfo>,
    /// Cursor for the next page; `None` on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A named collection of files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    /// Pinata's identifier for the group
    pub id: String,
    /// The group name
    pub name: String,
    /// Whether the group's files are publicly listed
    #[serde(default)]
    pub is_public: bool,
    /// When the group was created
    #[serde(deserialize_with = "crate::dates::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// One page of groups.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupList {
    /// The groups on this page
    pub groups: Vec<Group>,
    /// Cursor for the next page; `None` on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A CID swap: requests for one CID are served another CID's content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SwapRecord {
    /// The CID whose content is served instead
    pub mapped_cid: String,
    /// When the swap was applied
    #[serde(deserialize_with = "crate::dates::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Options for [`Client::upload_file`](crate::Client::upload_file).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Adds the file to this group
    pub group_id: Option<String>,
    /// Where to store the file; private by default
    pub network: Network,
}

/// Filters for [`Client::list_files`](crate::Client::list_files).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilesQuery {
    /// Maximum number of files per page
    pub limit: Option<u32>,
    /// Cursor returned by the previous page
    pub page_token: Option<String>,
    /// Only files in this group
    pub group_id: Option<String>,
    /// Only files with this name
    pub name: Option<String>,
    /// Only files with this CID
    pub cid: Option<String>,
    /// Only files of this MIME type
    pub mime_type: Option<String>,
}

/// Filters for [`Client::list_groups`](crate::Client::list_groups).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGroupsQuery {
    /// Maximum number of groups per page
    pub limit: Option<u32>,
    /// Cursor returned by the previous page
    pub page_token: Option<String>,
    /// Only groups whose name contains this text
    pub name: Option<String>,
    /// Only public or only private groups
    pub is_public: Option<bool>,
}

/// Changes to a file's metadata. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFile {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement key-values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyvalues: Option<HashMap<String, String>>,
}

/// A new group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroup {
    /// The group name
    pub name: String,
    /// Whether the group is public; the server default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// Changes to a group. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGroup {
    /// New group name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New visibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// Body of a swap request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// The CID to serve in place of the swapped one
    pub swap_cid: String,
}
