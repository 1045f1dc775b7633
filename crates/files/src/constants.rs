/// Extension of vendor export documents, compared case-insensitively.
pub const DOCUMENT_EXTENSION: &str = "xml";

/// Suffix appended to a file while it is being fetched.
pub const PARTIAL_SUFFIX: &str = ".part";
