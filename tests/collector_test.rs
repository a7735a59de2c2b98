mod common;

use std::fs::File;
use std::io::Write;

use classdep::io::collector::FileCollector;
use classdep::{Analyzer, Error, PackageFilter};
use common::{simple_class, write_class, ClassFileBuilder};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_jar(path: &std::path::Path, entries: &[(&str, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut jar = ZipWriter::new(file);
    for (name, bytes) in entries {
        jar.start_file(*name, SimpleFileOptions::default()).unwrap();
        jar.write_all(bytes).unwrap();
    }
    jar.finish().unwrap();
}

#[test]
fn collects_class_files_in_sorted_order() {
    let dir = TempDir::new().unwrap();
    write_class(dir.path(), "b/Y.class", &simple_class("b/Y"));
    write_class(dir.path(), "a/X.class", &simple_class("a/X"));
    write_class(dir.path(), "a/notes.txt", b"not a class");

    let mut collector = FileCollector::new();
    collector.add_root(dir.path()).unwrap();
    let sources = collector.collect().unwrap();

    let names: Vec<String> = sources.iter().map(|s| s.display_name()).collect();
    assert_eq!(names.len(), 2);
    assert!(names[0].ends_with("a/X.class"));
    assert!(names[1].ends_with("b/Y.class"));
}

#[test]
fn duplicate_roots_deduplicate_entries() {
    let dir = TempDir::new().unwrap();
    write_class(dir.path(), "a/X.class", &simple_class("a/X"));

    let mut collector = FileCollector::new();
    collector.add_root(dir.path()).unwrap();
    collector.add_root(dir.path()).unwrap();
    assert_eq!(collector.collect().unwrap().len(), 1);
}

#[test]
fn non_archive_file_is_an_invalid_root() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("classes.txt");
    std::fs::write(&path, b"plain text").unwrap();

    let mut collector = FileCollector::new();
    assert!(matches!(
        collector.add_root(&path).unwrap_err(),
        Error::InvalidRoot(_)
    ));
}

#[test]
fn analyzes_classes_inside_a_jar() {
    let dir = TempDir::new().unwrap();
    let jar_path = dir.path().join("app.jar");
    write_jar(
        &jar_path,
        &[
            (
                "a/X.class",
                ClassFileBuilder::new("a/X").field("Lb/Y;").build(),
            ),
            ("b/Y.class", simple_class("b/Y")),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec()),
        ],
    );

    let mut analyzer = Analyzer::new(PackageFilter::from_prefixes(["java.*"]));
    analyzer.add_root(&jar_path).unwrap();
    let metrics = analyzer.analyze().unwrap();

    assert_eq!(metrics.len(), 2);
    assert!(analyzer.graph().package("a").unwrap().efferents.contains("b"));
}

#[test]
fn archive_extension_matching_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let jar_path = dir.path().join("APP.JAR");
    write_jar(&jar_path, &[("a/X.class", simple_class("a/X"))]);

    let mut collector = FileCollector::new();
    collector.add_root(&jar_path).unwrap();
    assert_eq!(collector.collect().unwrap().len(), 1);
}

#[test]
fn inner_class_filtering_applies_to_archive_entries() {
    let dir = TempDir::new().unwrap();
    let jar_path = dir.path().join("app.jar");
    write_jar(
        &jar_path,
        &[
            ("a/X.class", simple_class("a/X")),
            ("a/X$1.class", simple_class("a/X$1")),
        ],
    );

    let mut collector = FileCollector::new();
    collector.accept_inner_classes(false);
    collector.add_root(&jar_path).unwrap();
    assert_eq!(collector.collect().unwrap().len(), 1);
}

#[test]
fn mixed_directory_and_archive_roots_combine() {
    let dir = TempDir::new().unwrap();
    let classes = TempDir::new().unwrap();
    write_class(classes.path(), "a/X.class", &simple_class("a/X"));
    let jar_path = dir.path().join("lib.jar");
    write_jar(&jar_path, &[("b/Y.class", simple_class("b/Y"))]);

    let mut analyzer = Analyzer::new(PackageFilter::from_prefixes(["java.*"]));
    analyzer.add_root(classes.path()).unwrap();
    analyzer.add_root(&jar_path).unwrap();
    analyzer.analyze().unwrap();

    assert_eq!(analyzer.graph().class_count(), 2);
}
