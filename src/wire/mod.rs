/*!
 * Wire formats exchanged with GlobalSight.
 *
 * - `fields`: the upload/export document of `<field><name/><value/></field>` entries
 * - `responses`: typed decoders, one per SOAP response payload shape
 */

pub(crate) mod xml;
pub mod fields;
pub mod responses;

pub use fields::{decode_fields, encode_fields, FieldMap, NameEncoding, TranslatableField};
pub use responses::{
    CancelAck, ExportFiles, FileProfile, FileProfileListing, JobStatusReport, LocaleSet,
    LocalizedDocuments,
};
