use depot_core::RepositoryMetadata;

const CENTRAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.x</groupId>
  <artifactId>lib</artifactId>
  <versioning>
    <latest>1.1</latest>
    <release>1.1</release>
    <versions>
      <version>1.0</version>
      <version>1.1</version>
    </versions>
    <lastUpdated>20230101000000</lastUpdated>
  </versioning>
</metadata>"#;

const MIRROR: &str = r#"<metadata>
  <groupId>com.x</groupId>
  <artifactId>lib</artifactId>
  <versioning>
    <versions>
      <version>1.1</version>
      <version>1.10</version>
      <version>2.0-SNAPSHOT</version>
    </versions>
    <lastUpdated>20230301120000</lastUpdated>
  </versioning>
</metadata>"#;

#[test]
fn merged_document_is_written_and_read_back() {
    let mut merged = RepositoryMetadata::from_xml(CENTRAL).unwrap();
    merged.merge(&RepositoryMetadata::from_xml(MIRROR).unwrap());

    assert_eq!(merged.versions(), ["1.0", "1.1", "1.10", "2.0-SNAPSHOT"]);
    assert_eq!(merged.last_updated(), Some("20230301120000"));

    let xml = merged.to_xml().unwrap();
    assert!(xml.starts_with("<?xml"));
    let reread = RepositoryMetadata::from_xml(&xml).unwrap();
    assert_eq!(reread, merged);

    let versioning = reread.versioning.as_ref().unwrap();
    assert_eq!(versioning.latest.as_deref(), Some("2.0-SNAPSHOT"));
    assert_eq!(versioning.release.as_deref(), Some("1.10"));
}

#[test]
fn merge_is_idempotent() {
    let mut once = RepositoryMetadata::from_xml(CENTRAL).unwrap();
    once.merge(&RepositoryMetadata::from_xml(MIRROR).unwrap());
    let mut twice = once.clone();
    twice.merge(&RepositoryMetadata::from_xml(MIRROR).unwrap());
    assert_eq!(once, twice);
}
