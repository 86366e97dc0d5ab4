//! Uploads a small file, lists recent files and prints a gateway link.
//!
//! Reads credentials from the environment:
//! - `PINATA_JWT`, or `PINATA_API_KEY` together with `PINATA_API_SECRET`
//! - `PINATA_GATEWAY` (optional) for the gateway link
//!
//! Run with: `cargo run --example upload_and_list`

use pinata::{Client, Error, ListFilesQuery, Network, UploadOptions};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("pinata=debug,upload_and_list=info")
        .init();

    let client = Client::from_env()?;

    println!("=== Upload ===");
    let uploaded = client
        .upload_file(
            b"hello from pinata-rs\n".to_vec(),
            "hello.txt",
            &UploadOptions {
                network: Network::Public,
                ..Default::default()
            },
        )
        .await?;
    println!("Id:  {}", uploaded.id);
    println!("CID: {}", uploaded.cid);
    if uploaded.is_duplicate == Some(true) {
        println!("(content was already stored)");
    }

    println!("\n=== Recent files ===");
    let page = client
        .list_files(&ListFilesQuery {
            limit: Some(5),
            ..Default::default()
        })
        .await?;
    for file in &page.files {
        println!(
            "{}  {:>8} bytes  {}",
            file.created_at.format("%Y-%m-%d %H:%M"),
            file.size,
            file.name.as_deref().unwrap_or(&file.cid)
        );
    }
    if let Some(token) = &page.next_page_token {
        println!("More files available (next page token: {})", token);
    }

    println!("\n=== Gateway ===");
    match client.gateway_url(&uploaded.cid) {
        Ok(url) => println!("{}", url),
        Err(Error::ConfigurationError(message)) => println!("Skipped: {}", message),
        Err(e) => return Err(e),
    }

    Ok(())
}
