use depot_core::{ArtifactCoordinate, ArtifactKind, Layout, LayoutError, parse_filename};
use rstest::*;

fn coordinate(
    namespace: &str,
    artifact_id: &str,
    version: &str,
    artifact_version: &str,
    classifier: Option<&str>,
    extension: &str,
) -> ArtifactCoordinate {
    let mut builder = ArtifactCoordinate::builder()
        .namespace(namespace)
        .artifact_id(artifact_id)
        .version(version)
        .artifact_version(artifact_version)
        .extension(extension);
    if let Some(classifier) = classifier {
        builder = builder.classifier(classifier);
    }
    builder.build().unwrap()
}

#[rstest]
#[case(coordinate("com.x", "lib", "1.0", "1.0", None, "jar"), "com/x/lib/1.0/lib-1.0.jar")]
#[case(coordinate("org.acme.tools", "cli", "2.3.1", "2.3.1", Some("sources"), "jar"), "org/acme/tools/cli/2.3.1/cli-2.3.1-sources.jar")]
#[case(coordinate("com.x", "lib", "1.0-SNAPSHOT", "1.0-20230102.080000-1", None, "pom"), "com/x/lib/1.0-SNAPSHOT/lib-1.0-20230102.080000-1.pom")]
#[case(coordinate("com.x", "dist", "3.0", "3.0", Some("bin"), "tar.gz"), "com/x/dist/3.0/dist-3.0-bin.tar.gz")]
fn coordinates_survive_the_layout(#[case] coordinate: ArtifactCoordinate, #[case] path: &str) {
    let layout = Layout::default();
    assert_eq!(layout.to_path(&coordinate).unwrap(), path);

    let back = layout.to_coordinate(path).unwrap();
    assert_eq!(back.namespace(), coordinate.namespace());
    assert_eq!(back.artifact_id(), coordinate.artifact_id());
    assert_eq!(back.version(), coordinate.version());
    assert_eq!(back.artifact_version(), coordinate.artifact_version());
    assert_eq!(back.classifier(), coordinate.classifier());
    assert_eq!(layout.to_path(&back).unwrap(), path);
}

#[rstest]
#[case("com/x/lib-1.0.jar")]
#[case("com/x/lib/1.0/maven-metadata.xml")]
#[case("com/x/lib/1.0/other-2.0.jar")]
#[case("com/../lib/1.0/lib-1.0.jar")]
fn malformed_paths_are_layout_errors(#[case] path: &str) {
    let err = Layout::default().to_coordinate(path).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidPath { .. }), "{path}: {err:?}");
}

#[test]
fn parser_splits_the_documented_example() {
    let parsed = parse_filename("mylib", "2.3.1", "mylib-2.3.1-sources.jar");
    assert_eq!(parsed.id, "mylib");
    assert_eq!(parsed.version, "2.3.1");
    assert_eq!(parsed.classifier.as_deref(), Some("sources"));
    assert_eq!(parsed.extension, "jar");
    assert!(parsed.well_formed);
    assert_ne!(
        depot_core::infer_kind(&parsed, "mylib-2.3.1-sources.jar", |_| false),
        ArtifactKind::Unknown
    );
}
