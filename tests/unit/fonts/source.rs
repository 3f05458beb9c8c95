use super::*;

const CSS: &str = r#"
/* cyrillic */
@font-face {
  font-family: 'Noto Sans';
  font-weight: 700;
  src: url(https://fonts.example/s/notosans/v1/cyr.woff2) format('woff2');
}
/* latin */
@font-face {
  font-family: 'Noto Sans';
  src: url("https://fonts.example/s/notosans/v1/latin.ttf") format('truetype');
  src: url(/relative/ignored.ttf);
}
"#;

#[test]
fn urls_are_extracted_in_order() {
    assert_eq!(
        extract_font_urls(CSS),
        [
            "https://fonts.example/s/notosans/v1/cyr.woff2",
            "https://fonts.example/s/notosans/v1/latin.ttf",
        ]
    );
}

#[test]
fn unterminated_or_empty_urls_are_skipped() {
    assert!(extract_font_urls("src: url(https://").is_empty());
    assert!(extract_font_urls("src: url(https://)").is_empty());
    assert!(extract_font_urls("").is_empty());
}

#[test]
fn dir_source_paths() {
    let src = DirFontSource::new("/fonts");
    assert_eq!(
        src.stylesheet_path("Noto  Sans Mono", WeightToken::BOLD),
        Path::new("/fonts/Noto_Sans_Mono-700.css")
    );
    assert_eq!(
        src.asset_path("https://fonts.example/a/b/face.ttf?v=3").unwrap(),
        Path::new("/fonts/face.ttf")
    );
    assert!(src.asset_path("https://fonts.example/").is_err());
}

#[test]
fn dir_source_reads_stylesheet_and_assets() {
    let dir = std::env::temp_dir().join(format!("covergen-src-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("Test_Family-400.css"),
        "src: url(https://x.example/t.ttf)",
    )
    .unwrap();
    std::fs::write(dir.join("t.ttf"), b"bytes").unwrap();

    let mut src = DirFontSource::new(&dir);
    let css = src.stylesheet("Test Family", WeightToken::REGULAR).unwrap();
    let urls = extract_font_urls(&css);
    assert_eq!(src.fetch(&urls[0]).unwrap(), b"bytes");
    assert!(src.stylesheet("Test Family", WeightToken::BOLD).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn no_source_is_always_unavailable() {
    let mut src = NoFontSource;
    assert!(matches!(
        src.stylesheet("X", WeightToken::REGULAR),
        Err(CovergenError::ResourceUnavailable(_))
    ));
}
