//! Multipart uploads for `/generate`

use axum::extract::Multipart;
use unicode_normalization::UnicodeNormalization;

use crate::error::ApiError;

/// Extensions accepted for both uploads
pub const ALLOWED_EXTENSIONS: &[&str] = &["docx", "xlsx", "xls"];

/// One uploaded file
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as sent by the client
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Lower-cased extension after the last dot
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.file_name)
    }

    /// Name to store the upload under inside the scratch directory
    ///
    /// The client name is sanitized and prefixed with `role`; the extension
    /// is always kept since it selects the reader.
    pub fn stored_name(&self, role: &str) -> String {
        let extension = self.extension().unwrap_or_default();
        let secure = secure_filename(&self.file_name);

        if extension_of(&secure).as_deref() == Some(extension.as_str()) && secure.len() > extension.len() + 1 {
            format!("{}_{}", role, secure)
        } else {
            format!("{}.{}", role, extension)
        }
    }
}

/// The two files of a generate request
#[derive(Debug, Clone)]
pub struct GenerateUpload {
    pub template: UploadedFile,
    pub excel: UploadedFile,
}

/// Whether a file name carries one of the allowed extensions
pub fn allowed_file(file_name: &str) -> bool {
    extension_of(file_name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Reduce a client file name to a safe ASCII name
///
/// Accented letters are decomposed (NFKD) so `Ó` keeps its base `O`. Path
/// components are dropped, whitespace becomes `_`, characters other than
/// ASCII letters, digits, `.`, `_` and `-` are removed, and leading dots or
/// underscores are stripped.
pub fn secure_filename(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let decomposed: String = base.nfkd().collect();
    let cleaned: String = decomposed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Read the `template` and `excel` parts and validate them
///
/// Missing parts, empty file names and disallowed extensions are rejected
/// in that order, each with its own message.
pub async fn read_generate_upload(mut multipart: Multipart) -> Result<GenerateUpload, ApiError> {
    let mut template = None;
    let mut excel = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Formulario inválido: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != "template" && name != "excel" {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Formulario inválido: {}", e)))?
            .to_vec();

        tracing::debug!("Received {} upload {:?} ({} bytes)", name, file_name, data.len());
        let upload = UploadedFile { file_name, data };
        if name == "template" {
            template = Some(upload);
        } else {
            excel = Some(upload);
        }
    }

    let (template, excel) = match (template, excel) {
        (Some(template), Some(excel)) => (template, excel),
        _ => return Err(ApiError::BadRequest("Faltan archivos requeridos".to_string())),
    };

    if template.file_name.is_empty() || excel.file_name.is_empty() {
        return Err(ApiError::BadRequest("No se seleccionaron archivos".to_string()));
    }

    if !allowed_file(&template.file_name) || !allowed_file(&excel.file_name) {
        return Err(ApiError::BadRequest("Tipo de archivo no permitido".to_string()));
    }

    Ok(GenerateUpload { template, excel })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            data: Vec::new(),
        }
    }

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("plantilla.docx"));
        assert!(allowed_file("DATOS.XLSX"));
        assert!(allowed_file("viejo.tar.xls"));
        assert!(!allowed_file("notas.txt"));
        assert!(!allowed_file("docx"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool file.docx"), "My_cool_file.docx");
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\ana\\datos.xlsx"), "datos.xlsx");
        assert_eq!(secure_filename("INFORMACIÓN DIPLOMAS.xlsx"), "INFORMACION_DIPLOMAS.xlsx");
        assert_eq!(secure_filename("año señal.docx"), "ano_senal.docx");
        assert_eq!(secure_filename("ﬁcha.docx"), "ficha.docx");
        assert_eq!(secure_filename("..hidden"), "hidden");
    }

    #[test]
    fn test_stored_name_keeps_extension() {
        assert_eq!(upload("Diploma  nuevo 2025.docx").stored_name("template"), "template_Diploma_nuevo_2025.docx");
        assert_eq!(upload("ÑÑ.xlsx").stored_name("excel"), "excel_NN.xlsx");
        assert_eq!(upload("日本.xlsx").stored_name("excel"), "excel.xlsx");
        assert_eq!(upload("datos.XLS").stored_name("excel"), "excel_datos.XLS");
    }
}
