//! Layout of the originals ledger.

/// Column that identifies a document. Unique across the originals file.
pub const KEY_FIELD: &str = "DOC_ID";

/// Column the recency window is applied to.
pub const DATE_FIELD: &str = "ENTRY_DATE";

/// Columns of the originals file, in the order they are written.
pub const ORIGINALS_COLUMNS: &[&str] = &[
    "DOC_ID",
    "INVOICE_TYPE",
    "ENTRY_DATE",
    "COMPANY_CODE",
    "DOC_DATE",
    "INVOICE_NUMBER",
    "AMOUNT",
    "VENDOR_NUM",
    "VENDOR_NAME_1",
    "VENDOR_NAME_2",
    "PO_NUM",
    "ABN",
    "DSS_DOWNLOAD_DATE",
    "STATUS_TEXT",
];
