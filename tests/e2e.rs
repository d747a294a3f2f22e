//! End-to-end integration tests for ghostpdf.
//!
//! These tests invoke a real Ghostscript binary and are gated behind the
//! `E2E_ENABLED` environment variable plus a runtime availability probe,
//! so they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use ghostpdf::{GhostPdfError, Session, SessionConfig, ShrinkOptions};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Probe for the configured Ghostscript binary.
fn ghostscript_available() -> bool {
    std::process::Command::new(SessionConfig::default().gs_binary)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Skip this test unless E2E_ENABLED is set *and* gs is installed.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if !ghostscript_available() {
            println!("SKIP — Ghostscript binary not found (set GHOSTPDF_GS)");
            return;
        }
    }};
}

/// Assemble a minimal but structurally valid PDF with `page_count` empty
/// pages, including a correct xref table. Enough for Ghostscript to open,
/// count, rasterize, and rewrite.
fn minimal_pdf(page_count: usize) -> Vec<u8> {
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 3 + i)).collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
    ];
    for _ in 0..page_count {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 200] >>".to_string());
    }

    let mut body = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, obj) in objects.iter().enumerate() {
        offsets.push(body.len());
        body.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, obj));
    }

    let xref_pos = body.len();
    body.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    body.push_str("0000000000 65535 f \n");
    for off in &offsets {
        body.push_str(&format!("{off:010} 00000 n \n"));
    }
    body.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_pos
    ));
    body.into_bytes()
}

// ── Inspection ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn page_count_matches_fixture() {
    e2e_skip_unless_ready!();

    let mut session = Session::new(minimal_pdf(3), SessionConfig::default());
    assert_eq!(session.page_count().await.unwrap(), Some(3));

    let mut single = Session::new(minimal_pdf(1), SessionConfig::default());
    assert_eq!(single.page_count().await.unwrap(), Some(1));
}

#[tokio::test]
async fn page_count_reuses_the_materialized_file() {
    e2e_skip_unless_ready!();

    let mut session = Session::new(minimal_pdf(2), SessionConfig::default());
    assert_eq!(session.page_count().await.unwrap(), Some(2));
    let first = session.materialized_path().unwrap().to_path_buf();

    assert_eq!(session.page_count().await.unwrap(), Some(2));
    let second = session.materialized_path().unwrap().to_path_buf();
    assert_eq!(first, second);
}

#[tokio::test]
async fn version_and_count_from_local_file() {
    e2e_skip_unless_ready!();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.pdf");
    std::fs::write(&path, minimal_pdf(4)).unwrap();

    let mut session = Session::from_input(path.to_str().unwrap(), SessionConfig::default());
    assert_eq!(session.pdf_version().await.unwrap(), "1.4");
    assert_eq!(session.page_count().await.unwrap(), Some(4));
}

// ── Page-image extraction ────────────────────────────────────────────────────

#[tokio::test]
async fn page_image_yields_png_bytes() {
    e2e_skip_unless_ready!();

    let mut session = Session::new(minimal_pdf(2), SessionConfig::default());
    let png = session.page_image(1, Some(72)).await.unwrap();

    assert!(!png.is_empty());
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n", "output must be a PNG");
}

#[tokio::test]
async fn out_of_range_page_is_a_converter_error() {
    e2e_skip_unless_ready!();

    let mut session = Session::new(minimal_pdf(1), SessionConfig::default());
    let err = session.page_image(99, Some(72)).await.unwrap_err();
    assert!(matches!(err, GhostPdfError::PageImageFailed { page: 99, .. }));

    // The session's primary temp file is unaffected and reusable.
    assert_eq!(session.page_count().await.unwrap(), Some(1));
}

// ── Shrink ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn shrink_never_grows_output() {
    e2e_skip_unless_ready!();

    let input = minimal_pdf(2);
    let mut session = Session::new(input.clone(), SessionConfig::default());

    let shrunk = session.shrink(&ShrinkOptions::default()).await.unwrap();
    assert!(
        shrunk.len() <= input.len(),
        "shrink returned {} bytes for a {}-byte input",
        shrunk.len(),
        input.len()
    );
}

#[tokio::test]
async fn shrink_with_explicit_options_never_grows_output() {
    e2e_skip_unless_ready!();

    let input = minimal_pdf(2);
    let mut session = Session::new(input.clone(), SessionConfig::default());

    let options = ShrinkOptions::default()
        .dpi(72)
        .pdf_version("1.4")
        .grayscale(true);
    let shrunk = session.shrink(&options).await.unwrap();
    assert!(shrunk.len() <= input.len());
}

#[tokio::test]
async fn shrink_defaults_to_the_detected_version() {
    e2e_skip_unless_ready!();

    // No pdf_version given: the session's own detected version (1.4 for
    // the fixture) becomes the compatibility level. Success is enough —
    // an invalid level would make gs exit nonzero.
    let mut session = Session::new(minimal_pdf(1), SessionConfig::default());
    let shrunk = session.shrink(&ShrinkOptions::default()).await.unwrap();
    assert!(shrunk.starts_with(b"%PDF-"));
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_session_lifecycle() {
    e2e_skip_unless_ready!();

    let mut session = Session::new(minimal_pdf(2), SessionConfig::default());

    assert_eq!(session.pdf_version().await.unwrap(), "1.4");
    assert_eq!(session.page_count().await.unwrap(), Some(2));
    let png = session.page_image(2, Some(72)).await.unwrap();
    assert!(!png.is_empty());

    let temp = session.materialized_path().unwrap().to_path_buf();
    session.dispose();
    assert!(!temp.exists());

    // Operations keep working after disposal via re-materialization.
    assert_eq!(session.page_count().await.unwrap(), Some(2));
}
