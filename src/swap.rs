//! CID swap endpoints.
//!
//! A swap makes the gateway serve the content of one CID when another is
//! requested, without touching the original reference.

use crate::metadata::{path_segment, RequestMetadata};
use crate::models::{SwapRecord, SwapRequest};
use crate::{Client, Result};
use http::Method;

impl Client {
    /// Serves `swap_cid`'s content whenever `cid` is requested.
    pub async fn swap_cid(&self, cid: &str, swap_cid: &str) -> Result<SwapRecord> {
        let path = format!("v3/files/swap/{}", path_segment(cid)?);
        let body = SwapRequest {
            swap_cid: swap_cid.to_string(),
        };
        let metadata = RequestMetadata::new(Method::PUT, path).with_json(&body)?;
        Ok(self.call::<SwapRecord>(metadata).await?.data)
    }

    /// Lists the swaps applied to `cid`, optionally for one gateway domain.
    pub async fn swap_history(&self, cid: &str, domain: Option<&str>) -> Result<Vec<SwapRecord>> {
        let path = format!("v3/files/swap/{}", path_segment(cid)?);
        let metadata =
            RequestMetadata::new(Method::GET, path).with_optional_query_param("domain", domain);
        Ok(self.call::<Vec<SwapRecord>>(metadata).await?.data)
    }

    /// Removes the swap on `cid`, serving its original content again.
    pub async fn remove_swap(&self, cid: &str) -> Result<()> {
        let path = format!("v3/files/swap/{}", path_segment(cid)?);
        self.call_empty(RequestMetadata::new(Method::DELETE, path))
            .await
            .map(|_| ())
    }
}
