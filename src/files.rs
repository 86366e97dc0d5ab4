//! File endpoints.

use crate::metadata::{path_segment, Host, RequestMetadata};
use crate::models::{FileInfo, FileList, ListFilesQuery, UpdateFile, UploadOptions, UploadResponse};
use crate::multipart::Multipart;
use crate::{Client, Result};
use http::Method;

impl Client {
    /// Uploads a file to the upload host.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pinata::{Client, Credentials, Network, UploadOptions};
    ///
    /// # async fn example() -> Result<(), pinata::Error> {
    /// let client = Client::builder()
    ///     .credentials(Credentials::bearer("my-jwt"))
    ///     .build()?;
    ///
    /// let uploaded = client
    ///     .upload_file(
    ///         b"hello".to_vec(),
    ///         "hello.txt",
    ///         &UploadOptions {
    ///             network: Network::Public,
    ///             ..Default::default()
    ///         },
    ///     )
    ///     .await?;
    /// println!("Stored as {}", uploaded.cid);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn upload_file(
        &self,
        data: Vec<u8>,
        name: &str,
        options: &UploadOptions,
    ) -> Result<UploadResponse> {
        let form = Multipart::upload(data, name, options.group_id.as_deref(), options.network);
        let metadata = RequestMetadata::new(Method::POST, "v3/files")
            .on_host(Host::Upload)
            .with_multipart(form);
        Ok(self.call::<UploadResponse>(metadata).await?.data)
    }

    /// Lists one page of files.
    ///
    /// Pass the returned `next_page_token` back as `page_token` to fetch the
    /// following page.
    pub async fn list_files(&self, query: &ListFilesQuery) -> Result<FileList> {
        let metadata = RequestMetadata::new(Method::GET, "v3/files")
            .with_optional_query_param("limit", query.limit)
            .with_optional_query_param("pageToken", query.page_token.as_deref())
            .with_optional_query_param("group", query.group_id.as_deref())
            .with_optional_query_param("name", query.name.as_deref())
            .with_optional_query_param("cid", query.cid.as_deref())
            .with_optional_query_param("mimeType", query.mime_type.as_deref());
        Ok(self.call::<FileList>(metadata).await?.data)
    }

    /// Fetches one file by id.
    pub async fn get_file(&self, id: &str) -> Result<FileInfo> {
        let path = format!("v3/files/{}", path_segment(id)?);
        Ok(self.call::<FileInfo>(RequestMetadata::new(Method::GET, path)).await?.data)
    }

    /// Renames a file or replaces its key-values.
    pub async fn update_file(&self, id: &str, update: &UpdateFile) -> Result<FileInfo> {
        let path = format!("v3/files/{}", path_segment(id)?);
        let metadata = RequestMetadata::new(Method::PUT, path).with_json(update)?;
        Ok(self.call::<FileInfo>(metadata).await?.data)
    }

    /// Deletes a file.
    pub async fn delete_file(&self, id: &str) -> Result<()> {
        let path = format!("v3/files/{}", path_segment(id)?);
        self.call_empty(RequestMetadata::new(Method::DELETE, path))
            .await
            .map(|_| ())
    }
}
