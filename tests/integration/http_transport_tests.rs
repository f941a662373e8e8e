/*!
 * Integration tests for the HTTP SOAP transport
 */

use mockito::{Matcher, Server};
use quick_xml::escape::escape;

use globalsight_connector::app_config::ProxyConfig;
use globalsight_connector::soap::{HttpSoapTransport, SoapParams, SoapTransport};
use globalsight_connector::{ConnectorError, GlobalSightConnector};

use crate::common;

const SERVICE_PATH: &str = "/globalsight/services/AmbassadorWebService";

fn response_envelope(operation: &str, value: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <soapenv:Body><ns1:{op}Response xmlns:ns1=\"http://www.globalsight.com/webservices/\">\
         <{op}Return>{}</{op}Return></ns1:{op}Response></soapenv:Body></soapenv:Envelope>",
        escape(value),
        op = operation
    )
}

fn fault_envelope(message: &str) -> String {
    format!(
        "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <soapenv:Body><soapenv:Fault><faultcode>soapenv:Server.userException</faultcode>\
         <faultstring>{}</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>",
        message
    )
}

fn transport_for(server: &Server) -> HttpSoapTransport {
    let config = common::connector_config(&format!("{}{}", server.url(), SERVICE_PATH));
    HttpSoapTransport::new(&config).unwrap()
}

#[tokio::test]
async fn test_call_shouldPostEnvelopeAndReturnValue() {
    common::init_test_logging();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", SERVICE_PATH)
        .match_header("content-type", "text/xml; charset=utf-8")
        .match_header("soapaction", "\"\"")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("<gs:login>".to_string()),
            Matcher::Regex("<p_username>drupal</p_username>".to_string()),
            Matcher::Regex("<p_password>s&amp;cret</p_password>".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=utf-8")
        .with_body(response_envelope("login", "token-xyz"))
        .create_async()
        .await;

    let transport = transport_for(&server);
    let params = SoapParams::new()
        .with("p_username", "drupal")
        .with("p_password", "s&cret");
    let token = transport.call("login", &params).await.unwrap();

    assert_eq!(token, "token-xyz");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_withFaultOnHttp500_shouldReturnFaultMessage() {
    common::init_test_logging();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", SERVICE_PATH)
        .with_status(500)
        .with_body(fault_envelope("Job with name unknown does not exist"))
        .create_async()
        .await;

    let transport = transport_for(&server);
    let params = SoapParams::new().with("p_accessToken", "t").with("p_jobName", "unknown");

    match transport.call("cancelJob", &params).await {
        Err(ConnectorError::TransportFault { operation, message }) => {
            assert_eq!(operation, "cancelJob");
            assert!(message.contains("does not exist"));
        }
        other => panic!("expected transport fault, got {:?}", other),
    }
}

#[tokio::test]
async fn test_call_withHtmlErrorPage_shouldReportHttpStatus() {
    common::init_test_logging();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", SERVICE_PATH)
        .with_status(503)
        .with_body("<html><body>Service Unavailable</body></html>")
        .create_async()
        .await;

    let transport = transport_for(&server);
    let err = transport.call("login", &SoapParams::new()).await.unwrap_err();

    assert!(matches!(err, ConnectorError::TransportFault { .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_call_withVoidResponse_shouldReturnEmpty() {
    common::init_test_logging();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", SERVICE_PATH)
        .with_status(200)
        .with_body(
            "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
             <soapenv:Body><ns1:uploadFileResponse xmlns:ns1=\"x\"/></soapenv:Body></soapenv:Envelope>",
        )
        .create_async()
        .await;

    let transport = transport_for(&server);
    assert_eq!(transport.call("uploadFile", &SoapParams::new()).await.unwrap(), "");
}

#[tokio::test]
async fn test_download_shouldFetchDocumentsAndReportMissingOnes() {
    common::init_test_logging();
    let mut server = Server::new_async().await;
    let document = common::export_document("42", &[("title", "Bonjour")]);
    let _found = server
        .mock("GET", "/exports/fr_FR/42.xml")
        .with_status(200)
        .with_body(document.clone())
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/exports/fr_FR/43.xml")
        .with_status(404)
        .create_async()
        .await;

    let transport = transport_for(&server);
    let body = transport
        .download(&format!("{}/exports/fr_FR/42.xml", server.url()))
        .await
        .unwrap();
    assert_eq!(body, document);

    let err = transport
        .download(&format!("{}/exports/fr_FR/43.xml", server.url()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_connector_overHttp_shouldResolveLocales() {
    common::init_test_logging();
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", SERVICE_PATH)
        .match_body(Matcher::Regex("<gs:login>".to_string()))
        .with_status(200)
        .with_body(response_envelope("login", "token-1"))
        .create_async()
        .await;
    let profiles = server
        .mock("POST", SERVICE_PATH)
        .match_body(Matcher::Regex(
            "<gs:getFileProfileInfoEx><p_accessToken>token-1</p_accessToken>".to_string(),
        ))
        .with_status(200)
        .with_body(response_envelope("getFileProfileInfoEx", common::PROFILE_LISTING))
        .create_async()
        .await;

    let config = common::connector_config(&format!("{}{}", server.url(), SERVICE_PATH));
    let connector = GlobalSightConnector::from_config(config).unwrap();
    let locales = connector.resolve_locales().await.unwrap();

    assert_eq!(locales.source, vec!["en_US"]);
    assert_eq!(locales.target, vec!["fr_FR", "de_DE"]);
    profiles.assert_async().await;
}

#[tokio::test]
async fn test_connector_withRejectedLogin_shouldBeUnavailable() {
    common::init_test_logging();
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", SERVICE_PATH)
        .with_status(500)
        .with_body(fault_envelope("Invalid user name or password"))
        .create_async()
        .await;

    let config = common::connector_config(&format!("{}{}", server.url(), SERVICE_PATH));
    let connector = GlobalSightConnector::from_config(config).unwrap();

    let err = connector.authenticate().await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(!connector.is_available().await);
}

#[test]
fn test_new_withProxy_shouldBuildClient() {
    let mut config = common::connector_config("http://gs.example.com/ws");
    config.proxy = Some(ProxyConfig {
        host: "proxy.local".to_string(),
        port: 3128,
    });

    let transport = HttpSoapTransport::new(&config).unwrap();
    assert_eq!(transport.wsdl_url(), "http://gs.example.com/ws?wsdl");
}

#[test]
fn test_fromConfig_withInvalidEndpoint_shouldBeConfigurationError() {
    let config = common::connector_config("not a url");
    assert!(matches!(
        GlobalSightConnector::from_config(config),
        Err(ConnectorError::ConfigurationError(_))
    ));
}
