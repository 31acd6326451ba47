use bytes::Bytes;
use std::io::{Cursor, Write};
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

/// Build the ZIP archive served for a previously issued download URL.
pub fn result_zip(version: &str, filename: &str) -> zip::result::ZipResult<Bytes> {
    let timestamp = chrono::Local::now().to_rfc3339();
    let content = format!(
        "FME Server Mock Result\nVersion: {}\nFilename: {}\nTimestamp: {}",
        version, filename, timestamp
    );
    let metadata = serde_json::json!({
        "timestamp": timestamp,
        "mock": true,
        "status": "success",
    });

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("result.txt", options)?;
    zip.write_all(content.as_bytes())?;

    zip.start_file("metadata.json", options)?;
    zip.write_all(metadata.to_string().as_bytes())?;

    let cursor = zip.finish()?;
    Ok(Bytes::from(cursor.into_inner()))
}

const PRINT_PDF: &[u8] = b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << >> >>
endobj
4 0 obj
<< /Length 44 >>
stream
BT
/F1 12 Tf
100 700 Td
(QGIS Server Mock - Test PDF) Tj
ET
endstream
endobj
xref
0 5
0000000000 65535 f
0000000009 00000 n
0000000058 00000 n
0000000115 00000 n
0000000216 00000 n
trailer
<< /Size 5 /Root 1 0 R >>
startxref
311
%%EOF";

/// Single page PDF returned by atlas print requests.
pub fn print_pdf() -> Bytes {
    Bytes::from_static(PRINT_PDF)
}
