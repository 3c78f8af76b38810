//! trybuild compile-time tests for annotation_macros

#[test]
fn trybuild_annotation_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/annotate_ok.rs");
    t.pass("tests/trybuild/injectable_ok.rs");
}
