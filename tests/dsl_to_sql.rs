use dafi::prelude::*;
use pretty_assertions::assert_eq;

fn convert(criteria: &Criteria) -> SqlQuery {
    PsqlConverter::new(0).to_sql(criteria).expect("conversion failed")
}

fn count_placeholders(sql: &str) -> usize {
    sql.matches('$').count()
}

#[test]
fn scenario_single_equality() {
    let criteria =
        Criteria::new().filter(Filter::new("email", FilterOperator::Equal, "a@b.com"));
    let out = convert(&criteria);
    assert_eq!(out.sql, "WHERE email = $1");
    assert_eq!(out.args, vec![Value::from("a@b.com")]);
}

#[test]
fn scenario_in_list() {
    let criteria =
        Criteria::new().filter(Filter::new("id", FilterOperator::In, vec![1i64, 2, 3]));
    let out = convert(&criteria);
    assert_eq!(out.sql, "WHERE id IN ($1, $2, $3)");
    assert_eq!(out.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn scenario_two_groups_from_text() {
    let filters = parse_filters(&[
        "( @email = [A] OR",
        "@nickname = [B] ) AND",
        "( @phone = [C] OR",
        "@name CONTAINS [D] )",
    ])
    .unwrap();
    let out = convert(&Criteria::new().filters(filters));
    assert_eq!(
        out.sql,
        "WHERE (email = $1 OR nickname = $2) AND (phone = $3 OR name ILIKE $4)"
    );
    assert_eq!(
        out.args,
        vec![Value::from("A"), Value::from("B"), Value::from("C"), Value::from("D")]
    );
}

#[test]
fn scenario_default_page_size() {
    let out = PsqlConverter::new(20)
        .to_sql(&Criteria::new().filter(Filter::new("email", FilterOperator::Equal, "a@b.com")))
        .unwrap();
    assert_eq!(out.sql, "WHERE email = $1 LIMIT 20 OFFSET 0");
}

#[test]
fn scenario_pagination_only() {
    let out = PsqlConverter::new(20).to_sql(&Criteria::new()).unwrap();
    assert_eq!(out.sql, "LIMIT 20 OFFSET 0");
    assert!(out.args.is_empty());
}

// An empty IN list removes the predicate: it does NOT mean "match no rows".
#[test]
fn scenario_empty_in_drops_the_predicate() {
    for value in [Value::Null, Value::from(Vec::<i64>::new())] {
        let criteria = Criteria::new().filter(Filter::new("id", FilterOperator::In, value));
        let out = convert(&criteria);
        assert_eq!(out.sql, "");
        assert!(out.args.is_empty());
    }

    let criteria = Criteria::new()
        .filter(Filter::new("id", FilterOperator::NotIn, Vec::<String>::new()))
        .sort(Sort::asc("id"));
    assert_eq!(convert(&criteria).sql, "ORDER BY id ASC");
}

#[test]
fn placeholders_match_args() {
    let filters = parse_filters(&[
        "@age >= [18] AND",
        "@id IN [1, 2, 3] OR",
        "@score NOT_IN [1.5, 2] AND",
        "@name CONTAINS [%jo%] AND",
        "@tags IN [a, b, c, d]",
    ])
    .unwrap();
    let expected = filters
        .iter()
        .map(|f| {
            if f.operator.is_list() {
                f.value.in_elements().len()
            } else {
                1
            }
        })
        .sum::<usize>();

    let out = convert(&Criteria::new().filters(filters));
    assert_eq!(expected, 11);
    assert_eq!(count_placeholders(&out.sql), expected);
    assert_eq!(out.args.len(), expected);
    assert_eq!(out.args[0], Value::from("18"));
    assert_eq!(out.args[1], Value::Int(1));
    assert_eq!(out.args[4], Value::Float(1.5));
    assert_eq!(out.args[6], Value::from("%jo%"));
    assert_eq!(out.args[10], Value::from("d"));
    for n in 1..=expected {
        assert!(out.sql.contains(&format!("${}", n)), "missing ${}", n);
    }
}

#[test]
fn flat_sequence_has_one_connective_between_items() {
    let lines = ["@a = [1] OR", "@b = [2]", "@c = [3] AND", "@d != [4]"];
    let out = convert(&Criteria::new().filters(parse_filters(&lines).unwrap()));
    assert_eq!(out.sql, "WHERE a = $1 OR b = $2 AND c = $3 AND d <> $4");

    let connectives = out.sql.matches(" AND ").count() + out.sql.matches(" OR ").count();
    assert_eq!(connectives, lines.len() - 1);
    for field in ["a", "b", "c", "d"] {
        assert_eq!(out.sql.matches(&format!(" {} ", field)).count(), 1);
    }
}

#[test]
fn conversion_is_idempotent() {
    let criteria = parse_criteria(
        &["(( @age > [30] ) AND", "( @name CONTAINS [John] ))", "@id IN [1, 2]"],
        "name+:age-",
        &["page:2", "limit:15"],
    )
    .unwrap();
    let converter = PsqlConverter::new(50);
    let first = converter.to_sql(&criteria).unwrap();
    let second = converter.to_sql(&criteria).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.sql,
        concat!(
            "WHERE ((age > $1) AND (name ILIKE $2)) AND id IN ($3, $4) ",
            "ORDER BY name ASC, age DESC LIMIT 15 OFFSET 15"
        )
    );
}

#[test]
fn parentheses_balance() {
    let criteria = Criteria::new().filters([
        Filter::new("a", FilterOperator::Equal, 1).open(3).or(),
        Filter::new("b", FilterOperator::Equal, 2).close(1).and(),
        Filter::new("c", FilterOperator::In, Value::Null).and(),
        Filter::new("d", FilterOperator::Equal, 4).close(2).or(),
        Filter::new("e", FilterOperator::Equal, 5).open(1).close(1),
    ]);
    let out = convert(&criteria);
    assert_eq!(out.sql.matches('(').count(), out.sql.matches(')').count());
    assert_eq!(
        out.sql,
        "WHERE (((a = $1 OR b = $2) AND d = $3)) OR (e = $4)"
    );
}

#[test]
fn invalid_line_returns_no_partial_model() {
    let err = parse_filters(&["@age > [30] AND", "@age 30"]).unwrap_err();
    assert!(matches!(err, DafiError::InvalidFilterFormat { line: 2, .. }));
}

#[test]
fn invalid_operator_in_document() {
    let err = serde_json::from_str::<Criteria>(
        r#"{"filters": [{"field": "a", "operator": "between", "value": 1}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid operator: 'between'"));
}

#[test]
fn shared_criteria_across_threads() {
    let criteria = Criteria::new()
        .filter(Filter::new("a", FilterOperator::Equal, 1))
        .filter(Filter::new("b", FilterOperator::In, vec![1i64, 2]))
        .paginate(10, 3);
    let converter = PsqlConverter::new(0);
    let expected = converter.to_sql(&criteria).unwrap();

    let (shared_converter, shared_criteria) = (&converter, &criteria);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(move |_| s.spawn(move || shared_converter.to_sql(shared_criteria).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });

    // the defaulted chaining key never lands on the shared model
    assert_eq!(criteria.filters[0].chaining_key, None);
    assert_eq!(expected.sql, "WHERE a = $1 AND b IN ($2, $3) LIMIT 10 OFFSET 20");
}
