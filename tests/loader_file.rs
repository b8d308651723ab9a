use education_finder::{
    filter, load_universities, render, Criteria, LoadError, Rendered, Strategy,
};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_fixture(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_latin1_file() {
    let file = write_fixture(
        b"name,country,city,website,fields\r\n\
          Universit\xe9 de Gen\xe8ve,Switzerland,Gen\xe8ve,https://unige.ch,Law|Medicine\r\n\
          ETH Zurich,Switzerland,Zurich,https://ethz.ch,Engineering|Computer Science\r\n",
    );

    let loaded = load_universities(file.path(), "latin1").unwrap();

    assert_eq!(loaded.strategy, Strategy::Sniffed { delimiter: b',' });
    assert_eq!(loaded.table.len(), 2);
    assert_eq!(loaded.table.records()[0].name, "Université de Genève");
    assert_eq!(loaded.table.records()[0].city, "Genève");
}

#[test]
fn test_quoted_file_end_to_end() {
    let file = write_fixture(
        b"\"name,country,city,website,fields\"\n\
          \"MIT,USA,Cambridge,https://mit.edu,Computer Science|Physics\"\n\
          \"Oxford,UK,Oxford,https://ox.ac.uk,Physics\"\n\
          \n",
    );

    let loaded = load_universities(file.path(), "latin1").unwrap();
    assert_eq!(loaded.strategy, Strategy::LineSplit);

    let rows = filter(
        &loaded.table,
        &Criteria::new().with_field("computer science"),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "MIT");

    let rendered = render(&loaded.table, &Criteria::new().with_country("France"));
    assert_eq!(rendered, Rendered::NoResults);
}

#[test]
fn test_whitespace_only_file_is_fatal() {
    let file = write_fixture(b"  \n\t\n\n");

    let err = load_universities(file.path(), "latin1").unwrap_err();
    assert!(matches!(err, LoadError::Empty));
    assert!(err.user_message().contains("CSV is empty"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_universities(Path::new("/nonexistent/universities.csv"), "latin1").unwrap_err();

    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.user_message().starts_with("⚠️ Error loading CSV"));
}
