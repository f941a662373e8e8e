/*!
 * Integration tests for the translator lifecycle on the SQLite job store
 */

use std::sync::Arc;

use globalsight_connector::database::{DatabaseConnection, JobRecordStatus, Repository};
use globalsight_connector::soap::MockTransport;
use globalsight_connector::{
    AbortOutcome, GlobalSightConnector, GlobalSightTranslator, JobNameStore, RequestOutcome,
    StatusResult,
};

use crate::common;

const ENDPOINT: &str = "http://gs.example.com/globalsight/services/AmbassadorWebService";

fn translator(mock: &MockTransport, repository: &Repository) -> GlobalSightTranslator {
    let connector = GlobalSightConnector::new(
        common::connector_config(ENDPOINT),
        Arc::new(mock.clone()),
    );
    GlobalSightTranslator::new(connector, Arc::new(repository.clone()))
}

fn file_repository(dir: &tempfile::TempDir) -> Repository {
    let db = DatabaseConnection::new(dir.path().join("jobs.db")).unwrap();
    Repository::new(db)
}

#[tokio::test]
async fn test_jobLifecycle_shouldSubmitPollReceiveAndAbort() {
    common::init_test_logging();
    let dir = common::create_temp_dir().unwrap();
    let repository = file_repository(&dir);
    let mock = common::accepting_transport()
        .respond(
            "getLocalizedDocuments",
            "<localizedDocuments><urlPrefix>http://gs.example.com/exports/</urlPrefix></localizedDocuments>",
        )
        .respond(
            "getJobExportFiles",
            "<jobFiles><paths>fr_FR/42.xml</paths></jobFiles>",
        )
        .serve(
            "http://gs.example.com/exports/fr_FR/42.xml",
            common::export_document("42", &[("title", "Bonjour le monde")]),
        )
        .respond("cancelJob", "");
    let translator = translator(&mock, &repository);

    let job_name = match translator.request_translation(&common::article_job()).await {
        RequestOutcome::Submitted { job_name } => job_name,
        RequestOutcome::Rejected { reason } => panic!("submission rejected: {}", reason),
    };
    assert!(job_name.starts_with("Hello_World_"));

    // Only the translatable title is uploaded
    let upload = &mock.calls_to("uploadFile")[0];
    assert_eq!(upload.get("p_jobName"), Some(job_name.as_str()));
    assert_eq!(upload.get("p_fileProfileId"), Some("12"));

    assert_eq!(
        repository.find_job_name("42").await.unwrap(),
        Some(job_name.clone())
    );

    match translator.job_status("42").await {
        StatusResult::Reported(report) => assert_eq!(report.state.as_str(), "LEVERAGING"),
        StatusResult::PermanentError => panic!("expected a status report"),
    }

    let translations = translator.fetch_translation("42").await.unwrap();
    assert_eq!(translations.len(), 1);
    assert_eq!(translations["title"], "Bonjour le monde");
    assert_eq!(
        mock.downloads(),
        vec!["http://gs.example.com/exports/fr_FR/42.xml".to_string()]
    );

    assert!(matches!(
        translator.abort_translation("42").await,
        AbortOutcome::Aborted
    ));
    let record = repository.get_record("42").await.unwrap().unwrap();
    assert_eq!(record.status, JobRecordStatus::Archived);
    assert_eq!(record.job_name, job_name);
}

#[tokio::test]
async fn test_abortTranslation_withUnknownRemoteJob_shouldLeaveRecordActive() {
    common::init_test_logging();
    let dir = common::create_temp_dir().unwrap();
    let repository = file_repository(&dir);
    let mock = common::logged_in_transport()
        .fault("cancelJob", "Job with name Hello_World_gone does not exist");
    let translator = translator(&mock, &repository);
    repository.save("42", "Hello_World_gone").await.unwrap();

    match translator.abort_translation("42").await {
        AbortOutcome::NotAborted { reason } => assert!(reason.contains("does not exist")),
        AbortOutcome::Aborted => panic!("cancel fault must not abort"),
    }

    let record = repository.get_record("42").await.unwrap().unwrap();
    assert_eq!(record.status, JobRecordStatus::Active);
    assert_eq!(repository.list_active().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_requestTranslation_whenResubmitted_shouldKeepOneRecord() {
    common::init_test_logging();
    let dir = common::create_temp_dir().unwrap();
    let repository = file_repository(&dir);
    let mock = common::accepting_transport();
    let translator = translator(&mock, &repository);
    let job = common::article_job();

    let first = translator
        .request_translation_named(&job, Some("first_submission".to_string()))
        .await;
    let second = translator
        .request_translation_named(&job, Some("second_submission".to_string()))
        .await;

    assert!(matches!(first, RequestOutcome::Submitted { .. }));
    assert!(matches!(second, RequestOutcome::Submitted { .. }));
    assert_eq!(
        repository.find_job_name("42").await.unwrap().as_deref(),
        Some("second_submission")
    );
    assert_eq!(repository.list_active().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_records_shouldSurviveReopeningTheDatabase() {
    common::init_test_logging();
    let dir = common::create_temp_dir().unwrap();
    {
        let repository = file_repository(&dir);
        let mock = common::accepting_transport();
        let translator = translator(&mock, &repository);
        let outcome = translator
            .request_translation_named(&common::article_job(), Some("persisted".to_string()))
            .await;
        assert!(matches!(outcome, RequestOutcome::Submitted { .. }));
    }

    let reopened = file_repository(&dir);
    assert_eq!(
        reopened.find_job_name("42").await.unwrap().as_deref(),
        Some("persisted")
    );
}

#[tokio::test]
async fn test_requestTranslation_withImportFailure_shouldNotRecordJob() {
    common::init_test_logging();
    let dir = common::create_temp_dir().unwrap();
    let repository = file_repository(&dir);
    let mock = common::logged_in_transport()
        .respond("uploadFile", "")
        .respond("createJob", "")
        .respond("getStatus", common::status_document("job", "IMPORT_FAILED"));
    let translator = translator(&mock, &repository);

    match translator.request_translation(&common::article_job()).await {
        RequestOutcome::Rejected { reason } => assert!(reason.contains("IMPORT_FAILED")),
        RequestOutcome::Submitted { .. } => panic!("failed import must be rejected"),
    }
    assert!(repository.find_record("42").await.unwrap().is_none());
}
