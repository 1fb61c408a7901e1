// ABOUTME: Folder → document → resource traversal that drives an export run
// ABOUTME: Collects per-item failures instead of aborting, with progress reporting

use crate::{
    api::ApiClient,
    auth::{authenticate, Credentials},
    config::ExportConfig,
    convert::{extract_resource_refs, output_filename},
    model::{DocumentMetadata, Session},
    storage::{contained_path, entry_exists, write_atomic, write_file, ExportTarget},
    Error, Result,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Identifies what a recorded failure was about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Folder {
        folder: String,
    },
    Document {
        folder: String,
        doc_guid: String,
        title: String,
    },
    Resource {
        doc_guid: String,
        filename: String,
    },
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Folder { folder } => write!(f, "folder {}", folder),
            Item::Document {
                folder,
                doc_guid,
                title,
            } => write!(f, "document {:?} ({}) in {}", title, doc_guid, folder),
            Item::Resource { doc_guid, filename } => {
                write!(f, "resource {} of {}", filename, doc_guid)
            }
        }
    }
}

#[derive(Debug)]
pub struct Failure {
    pub item: Item,
    pub error: Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOutcome {
    Fetched,
    Skipped,
}

#[derive(Debug, Default)]
pub struct FolderReport {
    pub folder: String,
    pub documents_listed: usize,
    pub documents_exported: usize,
    pub resources_fetched: usize,
    pub resources_skipped: usize,
    pub failures: Vec<Failure>,
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub folders: Vec<FolderReport>,
    /// Folders that could not be listed or had no usable output directory.
    pub failures: Vec<Failure>,
}

impl ExportReport {
    pub fn all_failures(&self) -> impl Iterator<Item = &Failure> {
        self.failures
            .iter()
            .chain(self.folders.iter().flat_map(|f| f.failures.iter()))
    }

    pub fn failure_count(&self) -> usize {
        self.all_failures().count()
    }

    pub fn documents_exported(&self) -> usize {
        self.folders.iter().map(|f| f.documents_exported).sum()
    }

    pub fn resources_fetched(&self) -> usize {
        self.folders.iter().map(|f| f.resources_fetched).sum()
    }

    pub fn resources_skipped(&self) -> usize {
        self.folders.iter().map(|f| f.resources_skipped).sum()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exported {} docs from {} folders ({} resources fetched, {} skipped, {} failures)",
            self.documents_exported(),
            self.folders.len(),
            self.resources_fetched(),
            self.resources_skipped(),
            self.failure_count()
        )?;
        for failure in self.all_failures() {
            write!(f, "\n  {}: {}", failure.item, failure.error)?;
        }
        Ok(())
    }
}

pub struct Exporter<'a> {
    client: &'a ApiClient,
    session: &'a Session,
    config: &'a ExportConfig,
    show_progress: bool,
}

impl<'a> Exporter<'a> {
    pub fn new(client: &'a ApiClient, session: &'a Session, config: &'a ExportConfig) -> Self {
        Exporter {
            client,
            session,
            config,
            show_progress: true,
        }
    }

    pub fn hide_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Fetches, converts and writes one document, returning the resources it references.
    pub fn export_document(&self, output_dir: &Path, doc: &DocumentMetadata) -> Result<Vec<String>> {
        let path = contained_path(output_dir, &output_filename(&doc.title))?;

        let markup = self.client.view_document(self.session, doc)?;
        let markdown = self.config.converter.convert(&markup)?;
        write_atomic(&path, markdown.as_bytes())?;

        let refs = extract_resource_refs(&markdown);
        debug!(path = %path.display(), resources = refs.len(), "wrote document");
        Ok(refs)
    }

    /// Downloads one resource unless a file of that name is already present.
    pub fn fetch_resource(
        &self,
        resource_dir: &Path,
        doc: &DocumentMetadata,
        filename: &str,
    ) -> Result<ResourceOutcome> {
        let path = contained_path(resource_dir, filename)?;
        if entry_exists(&path)? {
            debug!(path = %path.display(), "resource already exported");
            return Ok(ResourceOutcome::Skipped);
        }

        let bytes = self.client.view_resource(self.session, doc, filename)?;
        write_file(&path, &bytes)?;
        Ok(ResourceOutcome::Fetched)
    }

    /// Exports every listed document of a folder. `Err` means nothing in the folder was attempted.
    pub fn export_folder(&self, folder: &str) -> Result<FolderReport> {
        let docs = self.client.list_folder(self.session, folder)?;
        info!(folder, documents = docs.len(), "listed folder");

        let target = ExportTarget::new(&self.config.output_root, folder);
        target.ensure_dirs()?;

        let mut report = FolderReport {
            folder: folder.to_string(),
            documents_listed: docs.len(),
            ..Default::default()
        };

        let pb = if self.show_progress {
            ProgressBar::new(docs.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len} docs")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb.set_message(folder.to_string());

        for doc in &docs {
            pb.suspend(|| {
                info!(
                    doc_guid = %doc.doc_guid,
                    title = %doc.title,
                    attachments = doc.attachment_count,
                    created = ?doc.created_at(),
                    "exporting document"
                )
            });

            match self.export_document(&target.folder_dir, doc) {
                Ok(refs) => {
                    report.documents_exported += 1;
                    for filename in refs {
                        match self.fetch_resource(&target.resource_dir, doc, &filename) {
                            Ok(ResourceOutcome::Fetched) => report.resources_fetched += 1,
                            Ok(ResourceOutcome::Skipped) => report.resources_skipped += 1,
                            Err(error) => {
                                let item = Item::Resource {
                                    doc_guid: doc.doc_guid.clone(),
                                    filename,
                                };
                                pb.suspend(|| warn!(%item, %error, "resource failed"));
                                report.failures.push(Failure { item, error });
                            }
                        }
                        self.config.pause();
                    }
                }
                Err(error) => {
                    let item = Item::Document {
                        folder: folder.to_string(),
                        doc_guid: doc.doc_guid.clone(),
                        title: doc.title.clone(),
                    };
                    pb.suspend(|| warn!(%item, %error, "document failed"));
                    report.failures.push(Failure { item, error });
                }
            }

            pb.inc(1);
            self.config.pause();
        }

        pb.finish_and_clear();
        info!(
            folder,
            exported = report.documents_exported,
            fetched = report.resources_fetched,
            skipped = report.resources_skipped,
            failures = report.failures.len(),
            "folder done"
        );

        Ok(report)
    }

    /// Walks every configured folder in order; a failed folder does not stop its siblings.
    pub fn export_all(&self) -> ExportReport {
        let mut report = ExportReport::default();

        for folder in &self.config.folders {
            match self.export_folder(folder) {
                Ok(folder_report) => report.folders.push(folder_report),
                Err(error) => {
                    let item = Item::Folder {
                        folder: folder.clone(),
                    };
                    warn!(%item, %error, "folder failed");
                    report.failures.push(Failure { item, error });
                }
            }
            self.config.pause();
        }

        report
    }
}

/// Authenticates once, then exports every configured folder.
///
/// Only a login failure is returned as `Err`; everything after that is recorded in the report.
pub fn run_export(
    client: &ApiClient,
    credentials: &Credentials,
    config: &ExportConfig,
    show_progress: bool,
) -> Result<ExportReport> {
    let session = authenticate(client, credentials)?;

    let exporter = Exporter::new(client, &session, config);
    let exporter = if show_progress {
        exporter
    } else {
        exporter.hide_progress()
    };

    Ok(exporter.export_all())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(item: Item) -> Failure {
        Failure {
            item,
            error: Error::Fetch {
                url: "https://kb.example.com/x".into(),
                status: Some(404),
                message: "HTTP 404 Not Found: ".into(),
            },
        }
    }

    fn sample_report() -> ExportReport {
        ExportReport {
            folders: vec![FolderReport {
                folder: "/Notes/".into(),
                documents_listed: 3,
                documents_exported: 2,
                resources_fetched: 4,
                resources_skipped: 1,
                failures: vec![failure(Item::Document {
                    folder: "/Notes/".into(),
                    doc_guid: "d-3".into(),
                    title: "Broken".into(),
                })],
            }],
            failures: vec![failure(Item::Folder {
                folder: "/Missing/".into(),
            })],
        }
    }

    #[test]
    fn test_report_totals() {
        let report = sample_report();
        assert_eq!(report.documents_exported(), 2);
        assert_eq!(report.resources_fetched(), 4);
        assert_eq!(report.resources_skipped(), 1);
        assert_eq!(report.failure_count(), 2);
    }

    #[test]
    fn test_report_failures_list_folder_level_first() {
        let report = sample_report();
        let items: Vec<&Item> = report.all_failures().map(|f| &f.item).collect();
        assert!(matches!(items[0], Item::Folder { .. }));
        assert!(matches!(items[1], Item::Document { .. }));
    }

    #[test]
    fn test_item_display() {
        let item = Item::Resource {
            doc_guid: "d-1".into(),
            filename: "pic.png".into(),
        };
        assert_eq!(item.to_string(), "resource pic.png of d-1");
    }

    #[test]
    fn test_empty_report_summary() {
        let report = ExportReport::default();
        assert_eq!(
            report.to_string(),
            "exported 0 docs from 0 folders (0 resources fetched, 0 skipped, 0 failures)"
        );
    }
}
