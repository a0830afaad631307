//! Service clients and the submission pipeline

pub mod archive_client;
pub mod case_sender;
pub mod consequence_selector;
pub mod pedigree_traversal;
pub mod record_mapper;
pub mod registry_client;
pub mod source_client;

pub use archive_client::ArchiveClient;
pub use case_sender::{CaseSender, SubmissionOptions};
pub use consequence_selector::{SelectionCriteria, SelectionError};
pub use pedigree_traversal::{PedigreeView, RelationLabel};
pub use record_mapper::MappingError;
pub use registry_client::RegistryClient;
pub use source_client::SourceClient;
