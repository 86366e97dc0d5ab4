//! Group endpoints.

use crate::metadata::{path_segment, RequestMetadata};
use crate::models::{CreateGroup, Group, GroupList, ListGroupsQuery, UpdateGroup};
use crate::{Client, Result};
use http::Method;

impl Client {
    /// Creates a group.
    pub async fn create_group(&self, group: &CreateGroup) -> Result<Group> {
        let metadata = RequestMetadata::new(Method::POST, "v3/files/groups").with_json(group)?;
        Ok(self.call::<Group>(metadata).await?.data)
    }

    /// Lists one page of groups.
    pub async fn list_groups(&self, query: &ListGroupsQuery) -> Result<GroupList> {
        let metadata = RequestMetadata::new(Method::GET, "v3/files/groups")
            .with_optional_query_param("limit", query.limit)
            .with_optional_query_param("pageToken", query.page_token.as_deref())
            .with_optional_query_param("nameContains", query.name.as_deref())
            .with_optional_query_param("isPublic", query.is_public);
        Ok(self.call::<GroupList>(metadata).await?.data)
    }

    /// Fetches one group by id.
    pub async fn get_group(&self, id: &str) -> Result<Group> {
        let path = format!("v3/files/groups/{}", path_segment(id)?);
        Ok(self.call::<Group>(RequestMetadata::new(Method::GET, path)).await?.data)
    }

    /// Renames a group or changes its visibility.
    pub async fn update_group(&self, id: &str, update: &UpdateGroup) -> Result<Group> {
        let path = format!("v3/files/groups/{}", path_segment(id)?);
        let metadata = RequestMetadata::new(Method::PUT, path).with_json(update)?;
        Ok(self.call::<Group>(metadata).await?.data)
    }

    /// Deletes a group. Its files are kept.
    pub async fn delete_group(&self, id: &str) -> Result<()> {
        let path = format!("v3/files/groups/{}", path_segment(id)?);
        self.call_empty(RequestMetadata::new(Method::DELETE, path))
            .await
            .map(|_| ())
    }

    /// Adds a file to a group.
    pub async fn add_file_to_group(&self, group_id: &str, file_id: &str) -> Result<()> {
        let path = membership_path(group_id, file_id)?;
        self.call_empty(RequestMetadata::new(Method::PUT, path))
            .await
            .map(|_| ())
    }

    /// Removes a file from a group.
    pub async fn remove_file_from_group(&self, group_id: &str, file_id: &str) -> Result<()> {
        let path = membership_path(group_id, file_id)?;
        self.call_empty(RequestMetadata::new(Method::DELETE, path))
            .await
            .map(|_| ())
    }
}

fn membership_path(group_id: &str, file_id: &str) -> Result<String> {
    Ok(format!(
        "v3/files/groups/{}/ids/{}",
        path_segment(group_id)?,
        path_segment(file_id)?
    ))
}
