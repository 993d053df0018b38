//! Name validation and upload file naming.

use crate::error::ValidationError;
use crate::identity::DocumentId;
use crate::version::VersionNumber;

/// Reject empty or whitespace-only names. The name is returned unchanged.
pub fn non_empty_name(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyName { field })
    } else {
        Ok(value)
    }
}

/// Storage file name for an upload that becomes `version` of a document.
///
/// `<document id>_<document name>_<version><extension>`, where the extension
/// is taken from the last `.` of the client's file name (without any
/// directory part). The id keeps documents that share a name apart. Path
/// separators and control characters in the document name become `_`, so
/// the result is always a single path component.
pub fn upload_file_name(
    document_id: DocumentId,
    document_name: &str,
    version: VersionNumber,
    original_file_name: &str,
) -> String {
    let stem: String = document_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!(
        "{document_id}_{stem}_{version}{}",
        extension(original_file_name)
    )
}

fn extension(file_name: &str) -> &str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: i64) -> VersionNumber {
        VersionNumber::new(n).unwrap()
    }

    fn doc(id: i64) -> DocumentId {
        DocumentId::new(id)
    }

    #[test]
    fn keeps_extension_of_original_file() {
        assert_eq!(
            upload_file_name(doc(1), "Policy", v(2), "scan.pdf"),
            "1_Policy_2.pdf"
        );
        assert_eq!(
            upload_file_name(doc(7), "Audit report", v(5), "final.tar.gz"),
            "7_Audit report_5.gz"
        );
    }

    #[test]
    fn no_extension_when_original_has_none() {
        assert_eq!(
            upload_file_name(doc(1), "Policy", v(3), "README"),
            "1_Policy_3"
        );
    }

    #[test]
    fn extension_ignores_directories_in_client_name() {
        assert_eq!(
            upload_file_name(doc(1), "Policy", v(2), "dir.v1/upload"),
            "1_Policy_2"
        );
        assert_eq!(
            upload_file_name(doc(1), "Policy", v(2), "C:\\docs\\scan.PNG"),
            "1_Policy_2.PNG"
        );
    }

    #[test]
    fn separators_in_document_name_are_replaced() {
        assert_eq!(
            upload_file_name(doc(3), "../etc/passwd", v(2), "x.txt"),
            "3_.._etc_passwd_2.txt"
        );
        assert!(!upload_file_name(doc(3), "a\\b/c", v(9), "y").contains(['/', '\\']));
    }

    #[test]
    fn documents_sharing_a_name_get_distinct_files() {
        let first = upload_file_name(doc(1), "Policy", v(2), "a.pdf");
        let second = upload_file_name(doc(2), "Policy", v(2), "b.pdf");
        assert_ne!(first, second);
    }

    #[test]
    fn non_empty_name_rejects_blank() {
        assert!(non_empty_name("name", "   ".to_string()).is_err());
        assert_eq!(non_empty_name("name", " A ".to_string()).unwrap(), " A ");
    }
}
