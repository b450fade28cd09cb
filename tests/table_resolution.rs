use stock_selector::literal::Literal;
use stock_selector::predicate::{Condition, Predicate};
use stock_selector::table::{render_tables, resolve, TableRef};

fn on(table: &str, column: Option<&str>) -> Predicate {
    let table = TableRef::parse(table).expect("table ok");
    let condition = match column {
        Some(_) => Condition::In(vec![Literal::Integer(1)]),
        None => Condition::Or(vec![String::from("1 = 1")]),
    };
    Predicate::new(table, column, condition).expect("predicate ok")
}

#[test]
fn primary_only() {
    assert_eq!(resolve("cn_stock_bar1d", &[]), vec!["cn_stock_bar1d"]);
}

#[test]
fn primary_first_then_first_seen_order_without_duplicates() {
    let predicates = vec![
        on("cn_stock_factors_base", None),
        on("cn_stock_bar1d", None),
        on("cn_stock_basic_info USING (instrument)", Some("list_sector")),
        on("cn_stock_status", Some("st_status")),
        on("cn_stock_factors_base", Some("sw2021_level1")),
        on("cn_stock_status", Some("st_status")),
    ];
    let tables = resolve("cn_stock_bar1d", &predicates);
    assert_eq!(
        tables,
        vec![
            "cn_stock_bar1d",
            "cn_stock_factors_base USING(date, instrument)",
            "cn_stock_basic_info USING (instrument)",
            "cn_stock_status USING(date, instrument)",
        ]
    );
    assert_eq!(
        render_tables(&tables),
        "cn_stock_bar1d\n    JOIN cn_stock_factors_base USING(date, instrument)\n    JOIN cn_stock_basic_info USING (instrument)\n    JOIN cn_stock_status USING(date, instrument)"
    );
}

#[test]
fn table_reference_parsing() {
    let table = TableRef::parse("cn_stock_basic_info USING (instrument)").expect("table ok");
    assert_eq!(table.name(), "cn_stock_basic_info");
    assert_eq!(table.join(), Some("USING (instrument)"));
    assert_eq!(table.qualify("list_sector"), "cn_stock_basic_info.list_sector");

    let table = TableRef::parse("cn_stock_valuation ON cn_stock_valuation.code = cn_stock_bar1d.instrument").expect("table ok");
    assert_eq!(table.name(), "cn_stock_valuation");

    assert!(TableRef::parse("cn_stock_status; DROP TABLE x").is_err());
    assert!(TableRef::parse("cn_stock_status WHERE 1 = 1").is_err());
}
