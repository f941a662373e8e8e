/*!
 * # GlobalSight Connector
 *
 * A Rust library delegating translation jobs to a remote GlobalSight
 * translation management system over its SOAP web service.
 *
 * ## Features
 *
 * - Authenticate against the service and discover file profiles and locales
 * - Submit content fields as a GlobalSight job and verify the upload
 * - Poll job status, cancel jobs and fetch translated fields
 * - Keep track of remote job names in a local SQLite store
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `connector`: The remote job lifecycle on top of a SOAP transport
 * - `translator`: Host-facing operations and the job name store seam
 * - `soap`: SOAP envelopes and transports:
 *   - `soap::http`: reqwest transport
 *   - `soap::mock`: scripted transport for tests
 * - `wire`: The fields document and typed response decoders
 * - `job`, `job_title`, `status`: Job types, job titles and remote states
 * - `database`: SQLite persistence of job names
 * - `language_utils`: ISO language code and locale utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod connector;
pub mod database;
pub mod errors;
pub mod job;
pub mod job_title;
pub mod language_utils;
pub mod soap;
pub mod status;
pub mod translator;
pub mod wire;

// Re-export main types for easier usage
pub use app_config::{Config, ConnectorConfig, FileProfileRef, TokenPolicy};
pub use connector::GlobalSightConnector;
pub use errors::{AppError, ConnectorError};
pub use job::{EmbeddedFields, FieldSource, RemoteJobHandle, TranslationJob};
pub use status::{JobState, StatusResult};
pub use translator::{
    AbortOutcome, Availability, GlobalSightTranslator, InMemoryJobNameStore, JobNameStore,
    RequestOutcome,
};
pub use wire::{FieldMap, TranslatableField};
