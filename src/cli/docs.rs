use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use m365_collab::types::DocumentRef;
use m365_collab::{Config, UploadRequest};
use serde::Serialize;
use tabled::Tabled;

use super::output::{print_output, print_single, print_success};
use super::{open_provider, OutputFormat};

#[derive(Args, Debug)]
pub struct DocsCommand {
    #[command(subcommand)]
    pub command: DocsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DocsSubcommand {
    /// List documents in a SharePoint folder
    List {
        /// Folder path inside the library (default: root)
        #[arg(long)]
        folder: Option<String>,

        /// Site ID (default: configured or first available site)
        #[arg(long)]
        site: Option<String>,
    },

    /// Upload a local file
    Upload {
        /// Local file to upload
        file: PathBuf,

        /// Name in the library (default: local file name)
        #[arg(long)]
        name: Option<String>,

        /// Target folder path
        #[arg(long)]
        folder: Option<String>,

        /// Site ID
        #[arg(long)]
        site: Option<String>,

        /// Fail instead of replacing an existing document
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Download a document by library path, or by item id as id:ITEM_ID
    Download {
        /// Library path or id:ITEM_ID
        document: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Site ID
        #[arg(long)]
        site: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "URL")]
    web_url: String,
}

pub async fn execute(
    cmd: DocsCommand,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    let provider = open_provider(config, provider)?;

    match cmd.command {
        DocsSubcommand::List { folder, site } => {
            let documents = provider
                .list_documents(folder.as_deref(), site.as_deref())
                .await?;
            let rows: Vec<DocumentRow> = documents
                .into_iter()
                .map(|doc| DocumentRow {
                    id: doc.id,
                    name: doc.name,
                    kind: (if doc.is_folder { "folder" } else { "file" }).to_string(),
                    size: doc.size.map(|s| s.to_string()).unwrap_or_default(),
                    web_url: doc.web_url.unwrap_or_default(),
                })
                .collect();
            print_output(&rows, format)
        }
        DocsSubcommand::Upload {
            file,
            name,
            folder,
            site,
            no_overwrite,
        } => {
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {:?}", file))?;
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .with_context(|| format!("Cannot derive a name from {:?}", file))?,
            };

            let mut upload = UploadRequest::new(name, content);
            upload.folder_path = folder;
            upload.site_id = site;
            if no_overwrite {
                upload = upload.overwrite(false);
            }

            let document = provider.upload_document(upload).await?;
            match format {
                OutputFormat::Json => print_single(&document),
                _ => {
                    print_success(&format!("Uploaded {}", document.path));
                    if let Some(url) = document.web_url {
                        println!("{}", url);
                    }
                    Ok(())
                }
            }
        }
        DocsSubcommand::Download {
            document,
            output,
            site,
        } => {
            let reference = DocumentRef::parse(&document);
            let content = provider
                .download_document(&reference, site.as_deref())
                .await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &content)
                        .await
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    print_success(&format!("Saved {} bytes to {:?}", content.len(), path));
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&content)?;
                    stdout.flush()?;
                }
            }
            Ok(())
        }
    }
}
