use std::collections::HashMap;
use std::fs;
use std::rc::Rc;
use tabproc_core::operation::{
    Distinct, FilterRow, Head, Join, Replace, SkipTail, Tail,
};
use tabproc_core::{
    dsv, read_table, DsvOptions, Operation, PipelineFile, Table, TableOperand, ValueRange,
};

fn left() -> Table {
    Table::from_str_rows(
        &[
            &["k", "left"],
            &["a", "1"],
            &["b", "2"],
            &["a", "3"],
            &["c", "4"],
            &["B", "5"],
        ],
        true,
    )
}

fn right() -> Rc<Table> {
    Rc::new(Table::from_str_rows(
        &[
            &["key", "right"],
            &["a", "x"],
            &["a", "y"],
            &["b", "z"],
            &["d", "w"],
        ],
        true,
    ))
}

fn join_rows(operation: Operation) -> usize {
    let mut table = left();
    let status = operation.operate(&mut table);
    assert!(status.is_success());
    table.data_row_count()
}

fn join() -> Join {
    Join {
        target: TableOperand::bound("right", right()),
        ..Join::default()
    }
}

#[test]
fn test_join_row_count_laws() {
    // shared keys: a (2 x 2), b (1 x 1)
    let inner = join_rows(Operation::InnerJoin(join()));
    assert_eq!(inner, 2 * 2 + 1);

    let left_outer = join_rows(Operation::LeftOuterJoin(join()));
    // unmatched left rows: c, B
    assert_eq!(left_outer, inner + 2);
    assert!(left_outer >= left().data_row_count());

    let full_outer = join_rows(Operation::FullOuterJoin(join()));
    // right rows matching no left key: d
    assert_eq!(full_outer, left_outer + 1);
}

#[test]
fn test_case_insensitive_join_matches_more() {
    let insensitive = Join {
        case_sensitive: false,
        ..join()
    };
    assert_eq!(join_rows(Operation::InnerJoin(insensitive)), 2 * 2 + 2);
}

#[test]
fn test_distinct_is_idempotent_and_counts_removed_rows() {
    let mut table = Table::from_str_rows(
        &[&["x", "1"], &["y", "2"], &["x", "1"], &["z", "3"], &["y", "2", ""]],
        false,
    );
    let distinct = Operation::Distinct(Distinct::default());
    let before = table.row_count();
    let status = distinct.operate(&mut table);
    assert_eq!(status.messages[0].message, "removed 2 duplicate rows");
    assert_eq!(before - table.row_count(), 2);
    let firsts: Vec<&str> = table.rows().iter().map(|r| r[0].as_str()).collect();
    assert_eq!(firsts, vec!["x", "y", "z"]);

    let once = table.clone();
    distinct.operate(&mut table);
    assert_eq!(table, once);
}

#[test]
fn test_head_and_tail_laws() {
    let mut header_only = left();
    Operation::Head(Head { count: 0 }).operate(&mut header_only);
    assert_eq!(header_only.row_count(), 1);
    assert!(header_only.has_header());

    let mut big = left();
    Operation::Head(Head { count: 99 }).operate(&mut big);
    assert_eq!(big, left());

    let mut tail_zero = left();
    Operation::Tail(Tail { count: 0 }).operate(&mut tail_zero);
    assert_eq!(tail_zero.row_count(), 1);

    let mut tail_big = left();
    Operation::Tail(Tail { count: 99 }).operate(&mut tail_big);
    assert_eq!(tail_big, left());

    let mut skipped = left();
    let status = Operation::SkipTail(SkipTail { count: 99 }).operate(&mut skipped);
    assert_eq!(status.warnings[0].target, "Skip tail");
    assert_eq!(skipped.row_count(), 1);
}

#[test]
fn test_replace_example() {
    let mut table = Table::from_str_rows(
        &[&["foo", "boo", "zoo"], &["oo", "o", "hello world"]],
        false,
    );
    let replace = Operation::Replace(Replace {
        query: "o".to_string(),
        replacer: "0".to_string(),
        target_column: 2,
        case_sensitive: true,
    });
    assert!(replace.verify_arguments().is_success());
    replace.operate(&mut table);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows()[0], vec!["foo", "boo", "z00"]);
    assert_eq!(table.rows()[1], vec!["oo", "o", "hell0 w0rld"]);

    let empty = Operation::Replace(Replace {
        query: String::new(),
        ..Replace::default()
    });
    let status = empty.verify_arguments();
    assert!(!status.is_success());
    assert_eq!(status.errors[0].target, "Replace");
}

#[test]
fn test_unset_filter_never_reaches_operate() {
    let pipeline = tabproc_core::Pipeline::from_steps(vec![Operation::FilterRow(
        FilterRow::default(),
    )]);
    let mut table = left();
    let status = pipeline.run(&mut table);
    assert!(!status.is_success());
    assert_eq!(table, left());
}

#[test]
fn test_value_range_laws() {
    for text in ["1-3,5,10", "7", "0-0,2-4", ""] {
        let once = ValueRange::parse(text).unwrap();
        let twice = ValueRange::parse(&once.to_string()).unwrap();
        assert_eq!(once, twice);
    }
    assert_eq!(ValueRange::parse("1-3,5,10").unwrap().to_string(), "1-3,5,10");
    assert_eq!(ValueRange::parse("1-3,4").unwrap().to_string(), "1-4");
}

#[test]
fn test_dsv_round_trip_without_special_characters() {
    for line in ["a\tb\tc", "\t\t", "single", "x\t\ty"] {
        let fields = dsv::split(line, "\t").unwrap();
        let written = dsv::write_row(&fields, "\t").unwrap();
        assert_eq!(dsv::split(&written, "\t").unwrap(), fields);
    }
}

#[test]
fn test_pipeline_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("orders.csv");
    let lookup = dir.path().join("lookup.csv");
    let output = dir.path().join("result.csv");
    fs::write(&input, "id;qty\n1;5\n2;7\n3;1\n").unwrap();
    fs::write(&lookup, "id;label\n1;one\n3;three\n").unwrap();

    let pipeline_json = serde_json::json!({
        "input": { "path": input, "separator": ";", "has_header": true },
        "tables": { "lookup": { "path": lookup, "separator": ";", "has_header": true } },
        "steps": [
            { "type": "left_outer_join", "key_index": 0, "target": "lookup", "target_key_index": 0 },
            {
                "type": "generate_column",
                "source_index": 1,
                "insert_index": 3,
                "header_name": "double",
                "conversion": { "type": "arithmetic", "domain": "integer", "op": "multiply", "operand": "2" }
            },
            { "type": "sort", "key_index": 3, "as_number": true, "reverse": true }
        ],
        "output": { "path": output, "separator": ";", "has_header": true }
    });
    let pipeline_path = dir.path().join("pipeline.json");
    fs::write(&pipeline_path, pipeline_json.to_string()).unwrap();

    let file = PipelineFile::load(&pipeline_path).unwrap();
    let tables = file.read_tables().unwrap();
    let pipeline = file.pipeline(&tables).unwrap();
    let mut table = file.input.read().unwrap();
    let status = pipeline.run(&mut table);
    assert!(status.is_success(), "{:?}", status.errors);

    file.output.as_ref().unwrap().write(&table).unwrap();
    let result = read_table(&output, &DsvOptions::with_separator(";").header(true)).unwrap();
    assert_eq!(
        result.rows(),
        Table::from_str_rows(
            &[
                &["id", "qty", "label", "double"],
                &["2", "7", "", "14"],
                &["1", "5", "one", "10"],
                &["3", "1", "three", "2"],
            ],
            true,
        )
        .rows()
    );
}

#[test]
fn test_bound_operands_share_the_loaded_table() {
    let file: PipelineFile = serde_json::from_str(
        r#"{ "input": { "path": "x" }, "steps": [ { "type": "paste", "table": "side" } ] }"#,
    )
    .unwrap();
    let side = Rc::new(Table::from_str_rows(&[&["p"]], false));
    let mut tables = HashMap::new();
    tables.insert("side".to_string(), Rc::clone(&side));

    let pipeline = file.pipeline(&tables).unwrap();
    let copy = pipeline.clone();
    assert_eq!(Rc::strong_count(&side), 4);
    assert_eq!(copy, pipeline);
}
