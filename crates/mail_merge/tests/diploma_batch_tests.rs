//! Integration tests for the diploma batch
//!
//! A workbook and a template are written to a scratch directory, the batch
//! runs end to end, and the generated archive is opened back to check names
//! and contents.

use mail_merge::{MergeEngine, MergeOptions, ARCHIVE_NAME, OUTPUT_FOLDER};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use store::docx::PackageBuilder;
use store::DocxPackage;
use tempfile::TempDir;

const TEMPLATE_BODY: &str = r#"<w:p><w:r><w:t xml:space="preserve">Se otorga a </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>{NOMBRE</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>_COMPLETO}</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Documento: {N_DOCUMENTO}</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:sectPr><w:headerReference w:type="default" r:id="rId1"/><w:footerReference w:type="default" r:id="rId2"/></w:sectPr>"#;

/// Scratch directory holding a template and a workbook
struct BatchFixture {
    dir: TempDir,
}

impl BatchFixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let template = PackageBuilder::from_body(TEMPLATE_BODY)
            .header(
                "rId1",
                "header1.xml",
                PackageBuilder::header_xml("<w:p><w:r><w:t>Diploma de {NOMBRE_COMPLETO}</w:t></w:r></w:p>"),
            )
            .footer(
                "rId2",
                "footer1.xml",
                PackageBuilder::footer_xml("<w:p><w:r><w:t>C.C. {N_DOCUMENTO}</w:t></w:r></w:p>"),
            )
            .to_bytes()
            .unwrap();
        std::fs::write(dir.path().join("template.docx"), template).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn template(&self) -> PathBuf {
        self.path().join("template.docx")
    }

    /// Write a workbook with a text header row and the given rows
    fn workbook(&self, headers: &[&str], rows: &[&[Cell]]) -> PathBuf {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                let (row_num, col_num) = ((r + 1) as u32, col as u16);
                match cell {
                    Cell::Text(s) => {
                        sheet.write_string(row_num, col_num, *s).unwrap();
                    }
                    Cell::Number(n) => {
                        sheet.write_number(row_num, col_num, *n).unwrap();
                    }
                }
            }
        }

        let path = self.path().join("datos.xlsx");
        workbook.save(&path).unwrap();
        path
    }
}

enum Cell {
    Text(&'static str),
    Number(f64),
}

fn texts_of(package: &DocxPackage, name: &str) -> Vec<String> {
    let bytes = package.part(name).unwrap();
    store::open_docx_bytes(bytes).unwrap().paragraph_texts()
}

#[test]
fn test_two_records_produce_two_diplomas() {
    let fixture = BatchFixture::new();
    let workbook = fixture.workbook(
        &["NOMBRE_COMPLETO", "N_DOCUMENTO"],
        &[
            &[Cell::Text("Ana Gomez"), Cell::Number(1234567.0)],
            &[Cell::Text("Luis Ruiz"), Cell::Text("89")],
        ],
    );

    let engine = MergeEngine::from_files(fixture.template(), &workbook, MergeOptions::default()).unwrap();
    let work_dir = fixture.path().join("work");
    let result = engine.generate_archive(&work_dir).unwrap();

    assert_eq!(result.total_records, 2);
    assert!(work_dir.join(OUTPUT_FOLDER).is_dir());

    let archive = DocxPackage::open(work_dir.join(ARCHIVE_NAME)).unwrap();
    let names: Vec<&str> = archive.part_names().collect();
    assert_eq!(names, vec!["Diploma_Ana_Gomez.docx", "Diploma_Luis_Ruiz.docx"]);

    assert_eq!(
        texts_of(&archive, "Diploma_Ana_Gomez.docx"),
        vec![
            "Se otorga a Ana Gomez",
            "Documento: 1.234.567",
            "Diploma de Ana Gomez",
            "C.C. 1.234.567",
        ]
    );
    assert_eq!(
        texts_of(&archive, "Diploma_Luis_Ruiz.docx"),
        vec![
            "Se otorga a Luis Ruiz",
            "Documento: 89",
            "Diploma de Luis Ruiz",
            "C.C. 89",
        ]
    );
}

#[test]
fn test_missing_name_column_uses_ordinal() {
    let fixture = BatchFixture::new();
    let workbook = fixture.workbook(
        &["N_DOCUMENTO"],
        &[&[Cell::Number(1000.0)], &[Cell::Number(2000.0)]],
    );

    let engine = MergeEngine::from_files(fixture.template(), &workbook, MergeOptions::default()).unwrap();
    let result = engine.execute(fixture.path().join("out")).unwrap();

    assert_eq!(
        result.file_names(),
        vec!["Diploma_SinNombre_1.docx", "Diploma_SinNombre_2.docx"]
    );

    let second = store::open_docx(&result.generated[1].path).unwrap();
    let texts = second.paragraph_texts();
    assert_eq!(texts[0], "Se otorga a {NOMBRE_COMPLETO}");
    assert_eq!(texts[1], "Documento: 2.000");
}

#[test]
fn test_template_parts_survive_the_merge() {
    let fixture = BatchFixture::new();
    let workbook = fixture.workbook(&["NOMBRE_COMPLETO"], &[&[Cell::Text("Ana")]]);

    let engine = MergeEngine::from_files(fixture.template(), &workbook, MergeOptions::default()).unwrap();
    let result = engine.execute(fixture.path().join("out")).unwrap();

    let template = DocxPackage::open(fixture.template()).unwrap();
    let generated = DocxPackage::open(&result.generated[0].path).unwrap();
    let template_parts: Vec<&str> = template.part_names().collect();
    let generated_parts: Vec<&str> = generated.part_names().collect();
    assert_eq!(template_parts, generated_parts);
    assert_eq!(
        template.part("[Content_Types].xml"),
        generated.part("[Content_Types].xml")
    );
}

#[test]
fn test_missing_template() {
    let fixture = BatchFixture::new();
    let workbook = fixture.workbook(&["NOMBRE_COMPLETO"], &[&[Cell::Text("Ana")]]);

    let result = MergeEngine::from_files(fixture.path().join("nope.docx"), &workbook, MergeOptions::default());
    assert!(matches!(result, Err(mail_merge::MailMergeError::FileNotFound(_))));
}
