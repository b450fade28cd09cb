use stock_selector::catalog::FilterCatalog;
use stock_selector::compiler::{Compiler, SelectionRequest};
use stock_selector::literal::Literal;
use stock_selector::predicate::{build, Condition};

fn setup() -> FilterCatalog {
    FilterCatalog::cn_stock().expect("built-in catalog is valid")
}

#[test]
fn full_selection_yields_no_predicate() {
    let catalog = setup();
    for dimension in &catalog.dimensions {
        let built = build(
            &dimension.all_labels(),
            &dimension.options,
            &dimension.table,
            dimension.column.as_deref(),
            dimension.operator,
        )
        .expect("build ok");
        assert!(built.is_none(), "selecting all of {} should not constrain", dimension.name);
    }
}

#[test]
fn full_selection_in_any_order_is_still_a_no_op() {
    let catalog = setup();
    let compiler = Compiler::new(&catalog);
    let request = SelectionRequest::new()
        .select("st_statuses", ["*ST", "正常", "ST"])
        .select("margin_tradings", ["非两融标的", "两融标的", "两融标的"]);
    let predicates = compiler.build_predicates(&request).expect("build ok");
    assert!(predicates.is_empty());
}

#[test]
fn strict_subset_yields_one_predicate_with_mapped_values() {
    let catalog = setup();
    for dimension in &catalog.dimensions {
        // drop the first option so the selection is a strict, non-empty subset
        let selection: Vec<String> = dimension.all_labels().into_iter().skip(1).collect();
        let predicate = build(
            &selection,
            &dimension.options,
            &dimension.table,
            dimension.column.as_deref(),
            dimension.operator,
        )
        .expect("build ok")
        .unwrap_or_else(|| panic!("{} should yield a predicate", dimension.name));
        let expected: Vec<Literal> = dimension.options.entries()[1..].iter().map(|e| e.value.clone()).collect();
        match predicate.condition() {
            Condition::In(values) => assert_eq!(values, &expected, "values of {}", dimension.name),
            Condition::Or(expressions) => {
                let expected: Vec<String> = expected.iter().filter_map(|v| v.as_text().map(String::from)).collect();
                assert_eq!(expressions, &expected, "expressions of {}", dimension.name);
            }
            other => panic!("unexpected condition {other:?}"),
        }
    }
}

#[test]
fn columns_are_qualified_with_the_bare_table_name() {
    let catalog = setup();
    let compiler = Compiler::new(&catalog);
    // list_sectors joins with its own condition "USING (instrument)"
    let request = SelectionRequest::new().select("list_sectors", ["主板", "科创板"]);
    let predicates = compiler.build_predicates(&request).expect("build ok");
    assert_eq!(predicates.len(), 1);
    assert_eq!(predicates[0].column(), Some("cn_stock_basic_info.list_sector"));
    assert_eq!(predicates[0].table().join(), Some("USING (instrument)"));
}

#[test]
fn unknown_labels_are_skipped() {
    let catalog = setup();
    let compiler = Compiler::new(&catalog);
    let request = SelectionRequest::new().select("st_statuses", ["正常", "退市"]);
    let predicates = compiler.build_predicates(&request).expect("build ok");
    assert_eq!(predicates.len(), 1);
    assert_eq!(predicates[0].condition(), &Condition::In(vec![Literal::Integer(0)]));
}

#[test]
fn unknown_dimension_is_rejected() {
    let catalog = setup();
    let compiler = Compiler::new(&catalog);
    let request = SelectionRequest::new().select("sectors", ["主板"]);
    let err = compiler.build_predicates(&request).unwrap_err();
    assert!(format!("{err}").contains("Unknown filter dimension: sectors"));
}
