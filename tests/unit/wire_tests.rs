/*!
 * Tests for the fields document and response decoders
 */

use globalsight_connector::soap::envelope;
use globalsight_connector::wire::{
    decode_fields, encode_fields, CancelAck, ExportFiles, FieldMap, FileProfileListing,
    JobStatusReport, NameEncoding, TranslatableField,
};
use globalsight_connector::JobState;

use crate::common;

#[test]
fn test_encodeFields_withMarkupValues_shouldRecoverThemVerbatim() {
    let mut fields = FieldMap::new();
    fields.insert(
        "body][0][value".to_string(),
        TranslatableField::translatable("<p>Fish &amp; chips & <b>more</b></p>"),
    );
    fields.insert("title][0][value".to_string(), TranslatableField::translatable("A < B"));
    fields.insert("nid".to_string(), TranslatableField::untranslatable("12"));

    let xml = encode_fields("42", &fields, NameEncoding::Raw);
    let decoded = decode_fields(&xml).unwrap();

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded["body][0][value"], "<p>Fish &amp; chips & <b>more</b></p>");
    assert_eq!(decoded["title][0][value"], "A < B");
}

#[test]
fn test_decodeFields_withExportDocument_shouldReadCdataValues() {
    let xml = common::export_document("42", &[("title", "Bonjour le monde"), ("body", "<p>Corps</p>")]);
    let decoded = decode_fields(&xml).unwrap();
    assert_eq!(decoded.keys().collect::<Vec<_>>(), vec!["title", "body"]);
    assert_eq!(decoded["body"], "<p>Corps</p>");
}

#[test]
fn test_decodeFields_withGarbage_shouldFail() {
    assert!(decode_fields("<fields><field><name>x</name>").is_err());
}

#[test]
fn test_fileProfileListing_fromFixture_shouldResolveByIdAndName() {
    let listing = FileProfileListing::decode(common::PROFILE_LISTING).unwrap();
    assert_eq!(listing.by_id("13").map(|p| p.name.as_str()), Some("japanese"));
    assert_eq!(listing.by_name("drupal_xml").map(|p| p.id.as_str()), Some("12"));
    assert_eq!(listing.by_id("13").unwrap().target_locales, vec!["ja_JP"]);

    let map = listing.into_map();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["12", "13"]);
}

#[test]
fn test_jobStatusReport_fromEnvelope_shouldDecodeNestedDocument() {
    let inner = common::status_document("Hello_abc", "EXPORTED");
    let escaped = inner.replace('<', "&lt;").replace('>', "&gt;");
    let response = format!(
        "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <soapenv:Body><ns1:getStatusResponse xmlns:ns1=\"http://www.globalsight.com/webservices/\">\
         <getStatusReturn>{}</getStatusReturn></ns1:getStatusResponse></soapenv:Body></soapenv:Envelope>",
        escaped
    );

    let value = envelope::parse_response("getStatus", &response).unwrap();
    let report = JobStatusReport::decode(&value).unwrap();
    assert_eq!(report.name.as_deref(), Some("Hello_abc"));
    assert_eq!(report.state, JobState::Exported);
}

#[test]
fn test_exportFiles_withSinglePath_shouldStillBeSequence() {
    let files = ExportFiles::decode("<jobFiles><paths>fr_FR/42/GlobalSight.xml</paths></jobFiles>").unwrap();
    assert_eq!(files.paths, vec!["fr_FR/42/GlobalSight.xml"]);
}

#[test]
fn test_cancelAck_withUnparsableText_shouldFail() {
    assert!(CancelAck::decode("Job canceled").is_err());
    assert!(CancelAck::decode("").unwrap().entries.is_empty());
}
