/// End-to-end scans of real C source through the lang-c parser.
/// Most tests parse with the preprocessor disabled so they do not depend
/// on a system compiler; the gcc test skips itself when gcc is missing.

use c_funcdefs::application::{scan_tree, ScanUsecase};
use c_funcdefs::domain::ast::{AstNode, AstNodeKind, Coord};
use c_funcdefs::domain::funcdef::TypeField;
use c_funcdefs::infrastructure::{LangCParser, PreprocessorSettings};
use c_funcdefs::ports::report_exporter::{CollectingSink, TextExporter};
use c_funcdefs::ports::SourceParser;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn write_c(dir: &TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, src).unwrap();
    path
}

fn scan_text(path: &Path, settings: PreprocessorSettings, field: TypeField) -> String {
    let parser = LangCParser::new(settings);
    let usecase = ScanUsecase::new(&parser);
    let mut exporter = TextExporter::new(Vec::new(), field);
    usecase.run(path, &mut exporter).unwrap();
    String::from_utf8(exporter.into_inner()).unwrap()
}

#[test]
fn no_function_definitions_no_output() {
    let dir = tempdir().unwrap();
    let path = write_c(&dir, "decls.c", "int counter;\nint helper(int);\nstruct s { int a; };\n");

    let out = scan_text(&path, PreprocessorSettings::disabled(), TypeField::Initializer);
    assert_eq!(out, "");
}

#[test]
fn single_main_reports_none_initializer() {
    let dir = tempdir().unwrap();
    let path = write_c(&dir, "main.c", "int main() {\n  return 0;\n}\n");

    let out = scan_text(&path, PreprocessorSettings::disabled(), TypeField::Initializer);
    assert_eq!(out, format!("main at {}:1:5 type None\n", path.display()));
}

#[test]
fn definitions_are_reported_in_source_order() {
    let dir = tempdir().unwrap();
    let src = "\n\nstatic int foo(int x)\n{\n    return x * 2;\n}\n\nint table[3];\n\nvoid bar(const char *msg, ...) { }\n";
    let path = write_c(&dir, "two.c", src);

    let out = scan_text(&path, PreprocessorSettings::disabled(), TypeField::Declared);
    let file = path.display();
    assert_eq!(
        out,
        format!(
            "foo at {file}:3:12 type int (int)\nbar at {file}:10:6 type void (const char *, ...)\n"
        )
    );
}

#[test]
fn function_bodies_are_not_scanned() {
    fn def(name: &str, line: usize, body: Vec<AstNode>) -> AstNode {
        AstNode::new(AstNodeKind::FunctionDefinition)
            .with_child(
                "declarator",
                AstNode::new(AstNodeKind::Declarator)
                    .with_name(name)
                    .with_coord(Some(Coord::new("n.c", line, Some(5))))
                    .with_slot("init", vec![]),
            )
            .with_child("body", AstNode::new(AstNodeKind::Compound).with_slot("items", body))
    }
    let root = AstNode::new(AstNodeKind::TranslationUnit)
        .with_slot("ext", vec![def("outer", 1, vec![def("inner", 2, vec![])]), def("next", 5, vec![])]);

    let mut sink = CollectingSink::default();
    scan_tree(&root, &mut sink, None).unwrap();
    let names: Vec<&str> = sink.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["outer", "next"]);
}

#[test]
fn preprocessed_input_maps_line_markers() {
    let dir = tempdir().unwrap();
    let src = "# 1 \"board.c\"\n# 1 \"inc/pins.h\" 1\nstatic int pin_count(void) { return 20; }\n# 12 \"board.c\" 2\nvoid setup(void) { }\n";
    let path = write_c(&dir, "board.i", src);

    let out = scan_text(&path, PreprocessorSettings::disabled(), TypeField::Initializer);
    assert_eq!(
        out,
        "pin_count at inc/pins.h:1:12 type None\nsetup at board.c:12:6 type None\n"
    );
}

#[test]
fn repeated_traversal_is_identical() {
    let dir = tempdir().unwrap();
    let path = write_c(&dir, "r.c", "void a(void) {}\nvoid b(void) {}\nvoid c(void) {}\n");
    let root = LangCParser::new(PreprocessorSettings::disabled())
        .parse(&path)
        .unwrap();

    let mut first = CollectingSink::default();
    scan_tree(&root, &mut first, None).unwrap();
    let mut second = CollectingSink::default();
    scan_tree(&root, &mut second, None).unwrap();

    assert_eq!(first.reports.len(), 3);
    assert_eq!(first.reports, second.reports);
}

#[test]
fn missing_coordinate_aborts_the_walk() {
    fn def(name: &str, coord: Option<Coord>) -> AstNode {
        AstNode::new(AstNodeKind::FunctionDefinition).with_child(
            "declarator",
            AstNode::new(AstNodeKind::Declarator)
                .with_name(name)
                .with_coord(coord)
                .with_slot("init", vec![]),
        )
    }
    let root = AstNode::new(AstNodeKind::TranslationUnit).with_slot(
        "ext",
        vec![
            def("first", Some(Coord::new("e.c", 1, Some(6)))),
            def("broken", None),
            def("never", Some(Coord::new("e.c", 9, Some(6)))),
        ],
    );

    let mut sink = CollectingSink::default();
    let err = scan_tree(&root, &mut sink, None).unwrap_err();

    assert_eq!(err.to_string(), "FunctionDefinition node has no coord");
    let names: Vec<&str> = sink.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["first"]);
}

#[test]
fn missing_input_file_fails_before_parsing() {
    let dir = tempdir().unwrap();
    let parser = LangCParser::new(PreprocessorSettings::default());
    let mut sink = CollectingSink::default();

    let err = ScanUsecase::new(&parser)
        .run(&dir.path().join("absent.c"), &mut sink)
        .unwrap_err();

    assert!(err.to_string().contains("Input file not found"));
    assert!(sink.reports.is_empty());
}

#[test]
fn gcc_preprocessing_with_include_dir() {
    if Command::new("gcc").arg("--version").output().is_err() {
        eprintln!("gcc not available, skipping");
        return;
    }

    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("inc")).unwrap();
    fs::write(
        dir.path().join("inc").join("device.h"),
        "#define PINS 20\nstatic inline int pin_count(void) { return PINS; }\n",
    )
    .unwrap();
    let main = write_c(
        &dir,
        "device.c",
        "#include \"device.h\"\n\nint read_pin(int pin) {\n  return pin < PINS;\n}\n",
    );

    let settings = PreprocessorSettings {
        include_dirs: vec![dir.path().join("inc")],
        ..PreprocessorSettings::default()
    };
    let parser = LangCParser::new(settings);

    let mut sink = CollectingSink::default();
    ScanUsecase::new(&parser).run(&main, &mut sink).unwrap();
    let names: Vec<&str> = sink.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["pin_count", "read_pin"]);
    assert!(sink.reports[0].coord.file.ends_with("device.h"));
    assert_eq!(sink.reports[1].coord.line, 3);

    let mut main_only = CollectingSink::default();
    let usecase = ScanUsecase {
        parser: &parser,
        main_file_only: true,
    };
    usecase.run(&main, &mut main_only).unwrap();
    let names: Vec<&str> = main_only.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["read_pin"]);
}
