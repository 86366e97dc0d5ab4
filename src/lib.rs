//! # Pinata - a client for the Pinata Files API
//!
//! Upload, list, fetch, update and delete files stored on IPFS through
//! Pinata, organise them into groups, and redirect CIDs with swaps.
//!
//! Every call goes through the same execution engine: credentials are
//! attached, the body is encoded, the request is sent through a pluggable
//! [`Transport`](transport::Transport), and the answer is classified.
//! Overloaded or failing servers and network faults are retried with a
//! linear backoff; client mistakes, auth failures and missing resources are
//! reported at once.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pinata::{Client, Credentials, ListFilesQuery, Network, UploadOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pinata::Error> {
//!     let client = Client::builder()
//!         .credentials(Credentials::bearer("my-jwt"))
//!         .gateway_domain("example.mypinata.cloud")
//!         .build()?;
//!
//!     let uploaded = client
//!         .upload_file(
//!             b"hello world".to_vec(),
//!             "hello.txt",
//!             &UploadOptions {
//!                 network: Network::Public,
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     println!("Uploaded {} -> {}", uploaded.id, client.gateway_url(&uploaded.cid)?);
//!
//!     let page = client.list_files(&ListFilesQuery::default()).await?;
//!     println!("{} files on the first page", page.files.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use pinata::{Client, Credentials, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().credentials(Credentials::bearer("t")).build()?;
//! match client.delete_file("file-id").await {
//!     Ok(()) => println!("Deleted"),
//!     Err(Error::NotFound) => println!("Already gone"),
//!     Err(Error::ServerError { status, .. }) => eprintln!("Gave up on status {}", status),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod credentials;
pub mod dates;
mod error;
mod files;
mod groups;
pub mod metadata;
mod models;
pub mod multipart;
mod request;
pub mod response;
pub mod retry;
mod swap;
pub mod transport;

pub use client::{Client, ClientBuilder, DEFAULT_API_URL, DEFAULT_UPLOAD_URL};
pub use config::Config;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use models::{
    CreateGroup, FileInfo, FileList, Group, GroupList, ListFilesQuery, ListGroupsQuery, Network,
    SwapRecord, SwapRequest, UpdateFile, UpdateGroup, UploadOptions, UploadResponse,
};
pub use request::HttpRequest;
pub use response::Response;
pub use retry::RetryPolicy;
