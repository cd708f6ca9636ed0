//! End-to-end tests: RSQL text through parsing and compilation to filter trees

use chrono::{TimeZone, Utc};
use rsql_filter::query::rsql::parse;
use rsql_filter::{
    ComparisonOperator, CompilerSettings, FilterEngine, FilterError, FilterNode, FilterValue,
    ParseFault, Schema, SyntaxNode, TypeRegistry, TypedValue, ValueType,
};
use std::io::Write;
use std::sync::Arc;

const SCHEMA: &str = r#"{
    "enums": { "Status": ["ACTIVE", "PENDING", "CLOSED"] },
    "entities": [
        {
            "name": "Person",
            "properties": {
                "id": { "type": "long", "stored_as": "_id" },
                "name": { "type": "string" },
                "age": { "type": "long" },
                "city": { "type": "string" },
                "vip": { "type": "boolean" },
                "born": { "type": "date" },
                "status": { "type": "enum", "name": "Status" },
                "tags": { "type": "string", "array": true },
                "address": {
                    "type": "object",
                    "properties": {
                        "city": { "type": "string" },
                        "zip": { "type": "string", "stored_as": "postal_code" }
                    }
                }
            }
        },
        {
            "name": "Post",
            "properties": {
                "id": { "type": "object_id", "stored_as": "_id" },
                "author": { "type": "reference", "entity": "Person" },
                "title": { "type": "string" },
                "score": { "type": "double" },
                "price": { "type": "custom", "name": "Money" }
            }
        }
    ]
}"#;

fn money_types() -> TypeRegistry {
    TypeRegistry::new().with_parser("Money", |s| {
        s.strip_suffix("CZK")
            .and_then(|amount| amount.parse::<i64>().ok())
            .map(TypedValue::Integer)
            .ok_or_else(|| ParseFault::Format("expected <amount>CZK".to_string()))
    })
}

fn schema() -> Arc<Schema> {
    Arc::new(Schema::from_json(SCHEMA).unwrap())
}

fn engine() -> FilterEngine {
    FilterEngine::with_type_registry(schema(), CompilerSettings::default(), money_types()).unwrap()
}

fn string(s: &str) -> TypedValue {
    TypedValue::String(s.to_string())
}

#[test]
fn test_tree_shape_preservation() {
    let filter = engine()
        .create_filter("age>=18;(city==Prague,city==Brno)", "Person")
        .unwrap();
    assert_eq!(
        filter,
        FilterNode::and(vec![
            FilterNode::field("age", ComparisonOperator::GreaterThanOrEqual, TypedValue::Integer(18)),
            FilterNode::or(vec![
                FilterNode::field("city", ComparisonOperator::Equal, string("Prague")),
                FilterNode::field("city", ComparisonOperator::Equal, string("Brno")),
            ]),
        ])
    );
}

#[test]
fn test_fail_fast_ordering() {
    match engine().create_filter("unknownField==1;age==oops", "Person") {
        Err(FilterError::UnresolvedSelector { selector }) => assert_eq!(selector, "unknownField"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_multi_value_fan_out() {
    let engine = engine();
    assert_eq!(
        engine.create_filter("status=in=(active,pending)", "Person").unwrap(),
        FilterNode::field_multi(
            "status",
            ComparisonOperator::In,
            vec![
                TypedValue::enum_member("Status", "ACTIVE"),
                TypedValue::enum_member("Status", "PENDING"),
            ]
        )
    );

    let err = engine
        .create_filter("status=in=(active,archived)", "Person")
        .unwrap_err();
    assert_eq!(err.kind(), "argument_format");
    assert!(err.to_string().contains("'archived'"), "{}", err);
    assert!(err.to_string().contains("for 'status'"), "{}", err);
}

#[test]
fn test_arity_enforcement() {
    let engine = engine();
    for operator in ComparisonOperator::all() {
        let node = |n: usize| SyntaxNode::comparison("age", operator, (1..=n).map(|i| i.to_string()));

        if operator.is_multi_value() {
            for n in 1..=5 {
                assert!(engine.compiler().compile(&node(n), "Person").is_ok(), "{} x{}", operator, n);
            }
        } else {
            assert!(engine.compiler().compile(&node(1), "Person").is_ok(), "{}", operator);
            for n in [0, 2, 3] {
                assert!(
                    matches!(
                        engine.compiler().compile(&node(n), "Person"),
                        Err(FilterError::Arity { .. })
                    ),
                    "{} x{}",
                    operator,
                    n
                );
            }
        }
    }
}

#[test]
fn test_arity_error_from_text() {
    match engine().create_filter("age==(1,2)", "Person") {
        Err(FilterError::Arity { selector, operator, got, expected }) => {
            assert_eq!(selector, "age");
            assert_eq!(operator, ComparisonOperator::Equal);
            assert_eq!((got, expected), (2, 1));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_value_shape_matches_arity() {
    let filter = engine()
        .create_filter("tags=all=(a);age=out=(1,2);name!=x;born=gt=2014-03-20", "Person")
        .unwrap();
    let FilterNode::Logical(and) = filter else {
        panic!("expected logical node");
    };
    for child in &and.children {
        let FilterNode::Field(field) = child else {
            panic!("expected field node");
        };
        assert!(field.is_well_formed(), "{:?}", field);
        assert_eq!(
            matches!(field.value, FilterValue::Multiple(_)),
            field.operator.is_multi_value()
        );
    }
}

#[test]
fn test_round_trip_coercion() {
    let engine = engine();
    let converter = engine.compiler().converter().clone();
    let status = ValueType::Enum(engine.schema().enumeration("Status").unwrap().clone());
    let instant = Utc.with_ymd_and_hms(2014, 3, 20, 15, 30, 42).unwrap();

    let cases = vec![
        (ValueType::Long, TypedValue::Integer(42)),
        (ValueType::Long, TypedValue::Integer(-9_000_000_000)),
        (ValueType::Integer, TypedValue::Integer(7)),
        (ValueType::Double, TypedValue::Double(2.5)),
        (ValueType::Float, TypedValue::Double(0.25)),
        (status, TypedValue::enum_member("Status", "PENDING")),
        (ValueType::Boolean, TypedValue::Boolean(false)),
        (ValueType::String, string("Prague")),
        (ValueType::ObjectId, TypedValue::ObjectId("5349b4ddd2781d08c09890f3".to_string())),
        (ValueType::Date, TypedValue::DateTime(instant)),
    ];
    for (target, value) in cases {
        let canonical = match &value {
            TypedValue::String(s) | TypedValue::ObjectId(s) => s.clone(),
            TypedValue::Enum { member, .. } => member.clone(),
            TypedValue::DateTime(dt) => dt.to_rfc3339(),
            other => other.to_string(),
        };
        assert_eq!(converter.convert(&canonical, &target).unwrap(), value, "{}", canonical);
    }

    assert_eq!(
        converter.convert("2014-03-20T15:30:42Z", &ValueType::Date).unwrap(),
        converter.convert("2014-03-20T15:30:42+00:00", &ValueType::Date).unwrap()
    );
}

#[test]
fn test_boolean_aliasing() {
    let engine = engine();
    for raw in ["true", "YES", "y", "TRUE"] {
        assert_eq!(
            engine.create_filter(&format!("vip=={}", raw), "Person").unwrap(),
            FilterNode::field("vip", ComparisonOperator::Equal, TypedValue::Boolean(true))
        );
    }
    for raw in ["false", "NO", "n"] {
        assert_eq!(
            engine.create_filter(&format!("vip=={}", raw), "Person").unwrap(),
            FilterNode::field("vip", ComparisonOperator::Equal, TypedValue::Boolean(false))
        );
    }
    assert!(matches!(
        engine.create_filter("vip==maybe", "Person"),
        Err(FilterError::ArgumentFormat { .. })
    ));
}

#[test]
fn test_selector_resolution() {
    let engine = engine();
    let resolver = engine.compiler().resolver();

    let d = resolver.resolve("address.city", "Person").unwrap();
    assert_eq!(d.storage_path, "address.city");
    assert_eq!(d.value_type, ValueType::String);
    assert!(!d.is_multi_valued);

    match resolver.resolve("address.country", "Person") {
        Err(FilterError::UnresolvedSelector { selector }) => assert_eq!(selector, "address.country"),
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(
        engine.create_filter("address.zip==60200", "Person").unwrap(),
        FilterNode::field("address.postal_code", ComparisonOperator::Equal, string("60200"))
    );
}

#[test]
fn test_reference_indirection() {
    let engine = engine();
    let d = engine.compiler().resolver().resolve("author", "Post").unwrap();
    assert_eq!(d.value_type, ValueType::Long);
    assert_eq!(d.storage_path, "author.$id");
    assert!(d.is_reference);

    assert_eq!(
        engine.create_filter("author=in=(1,2)", "Post").unwrap(),
        FilterNode::field_multi(
            "author.$id",
            ComparisonOperator::In,
            vec![TypedValue::Integer(1), TypedValue::Integer(2)]
        )
    );
    assert!(matches!(
        engine.create_filter("author==bob", "Post"),
        Err(FilterError::ArgumentFormat { .. })
    ));
}

#[test]
fn test_custom_types() {
    let engine = engine();
    assert_eq!(
        engine.create_filter("price<100CZK", "Post").unwrap(),
        FilterNode::field("price", ComparisonOperator::LessThan, TypedValue::Integer(100))
    );
    let err = engine.create_filter("price<100EUR", "Post").unwrap_err();
    assert!(err.is_user_error());

    let plain = FilterEngine::new(schema(), CompilerSettings::default()).unwrap();
    match plain.create_filter("price<100CZK", "Post") {
        Err(FilterError::UnsupportedType { type_name, selector }) => {
            assert_eq!(type_name, "Money");
            assert_eq!(selector.as_deref(), Some("price"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_error_kinds_are_user_errors() {
    let engine = engine();
    for (query, entity, kind) in [
        ("age==", "Person", "syntax"),
        ("age==1", "Nobody", "unknown_entity"),
        ("height==1", "Person", "unresolved_selector"),
        ("age==(1,2)", "Person", "arity"),
        ("age==old", "Person", "argument_format"),
        ("address==x", "Person", "unsupported_type"),
    ] {
        let err = engine.create_filter(query, entity).unwrap_err();
        assert_eq!(err.kind(), kind, "{}", query);
        assert!(err.is_user_error(), "{}", query);
    }
}

#[test]
fn test_concurrent_compilation_is_consistent() {
    let engine = engine();
    let queries = [
        "age>=18;(city==Prague,city==Brno)",
        "address.city==Brno,status=out=(closed)",
        "tags=all=(a,b);vip==y",
    ];
    let expected: Vec<FilterNode> = queries
        .iter()
        .map(|q| engine.create_filter(q, "Person").unwrap())
        .collect();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    for (query, expected) in queries.iter().zip(&expected) {
                        assert_eq!(&engine.create_filter(query, "Person").unwrap(), expected);
                    }
                }
            });
        }
    });
}

#[test]
fn test_parsed_tree_compiles_like_text() {
    let engine = engine();
    let text = "name=like=\"^J\";born<2014-03-20T15:30:42";
    let tree = parse(text).unwrap();
    assert_eq!(
        engine.compiler().compile(&tree, "Person").unwrap(),
        engine.create_filter(text, "Person").unwrap()
    );
}

#[test]
fn test_schema_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCHEMA.as_bytes()).unwrap();

    let schema = Schema::from_path(file.path()).unwrap();
    assert_eq!(schema.entity_names(), vec!["Person", "Post"]);

    let engine = FilterEngine::new(Arc::new(schema), CompilerSettings::default()).unwrap();
    assert!(engine.create_filter("name==x", "Person").is_ok());
}

#[test]
fn test_local_offset_setting() {
    let settings = CompilerSettings::from_json(r#"{ "local_offset_seconds": 7200 }"#).unwrap();
    let engine = FilterEngine::new(schema(), settings).unwrap();
    assert_eq!(
        engine.create_filter("born==2014-03-20T15:30:42", "Person").unwrap(),
        FilterNode::field(
            "born",
            ComparisonOperator::Equal,
            TypedValue::DateTime(Utc.with_ymd_and_hms(2014, 3, 20, 13, 30, 42).unwrap())
        )
    );
}
