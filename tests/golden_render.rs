use rsql_filter::{CompilerSettings, FilterEngine, Schema};
use serde_json::{json, Value};
use std::sync::Arc;

fn setup_engine() -> FilterEngine {
    let schema = Schema::from_json(
        r#"{
            "enums": { "Status": ["ACTIVE", "PENDING"] },
            "entities": [
                {
                    "name": "Person",
                    "properties": {
                        "id": { "type": "long" },
                        "name": { "type": "string" },
                        "age": { "type": "integer" },
                        "height": { "type": "float" },
                        "born": { "type": "date" },
                        "status": { "type": "enum", "name": "Status" },
                        "tags": { "type": "string", "array": true }
                    }
                },
                {
                    "name": "Post",
                    "properties": {
                        "id": { "type": "object_id", "stored_as": "_id" },
                        "author": { "type": "reference", "entity": "Person" },
                        "score": { "type": "double" }
                    }
                }
            ]
        }"#,
    )
    .unwrap();
    FilterEngine::new(Arc::new(schema), CompilerSettings::default()).unwrap()
}

fn render(query: &str, entity: &str) -> Value {
    setup_engine().create_query(query, entity).unwrap()
}

#[test]
fn golden_every_operator() {
    let cases = [
        ("age==30", json!({ "age": 30 })),
        ("age!=30", json!({ "age": { "$ne": 30 } })),
        ("age=gt=30", json!({ "age": { "$gt": 30 } })),
        ("age>30", json!({ "age": { "$gt": 30 } })),
        ("age=ge=30", json!({ "age": { "$gte": 30 } })),
        ("age=lt=30", json!({ "age": { "$lt": 30 } })),
        ("age<=30", json!({ "age": { "$lte": 30 } })),
        ("age=in=(1,2)", json!({ "age": { "$in": [1, 2] } })),
        ("age=out=(1)", json!({ "age": { "$nin": [1] } })),
        ("tags=all=(a,b)", json!({ "tags": { "$all": ["a", "b"] } })),
        ("name=like=\"^Jo\"", json!({ "name": { "$regex": "^Jo" } })),
        ("name=re=son$", json!({ "name": { "$regex": "son$" } })),
    ];
    for (query, expected) in cases {
        assert_eq!(render(query, "Person"), expected, "{}", query);
    }
}

#[test]
fn golden_nested_logic() {
    assert_eq!(
        render("name==John;(age<18,age>65);status=in=(active)", "Person"),
        json!({
            "$and": [
                { "name": "John" },
                { "$or": [ { "age": { "$lt": 18 } }, { "age": { "$gt": 65 } } ] },
                { "status": { "$in": ["ACTIVE"] } }
            ]
        })
    );
}

#[test]
fn golden_extended_json_values() {
    assert_eq!(
        render("born>=2014-03-20T16:30:42+01:00", "Person"),
        json!({ "born": { "$gte": { "$date": "2014-03-20T15:30:42.000Z" } } })
    );
    assert_eq!(
        render("id==5349B4DDD2781D08C09890F3", "Post"),
        json!({ "_id": { "$oid": "5349b4ddd2781d08c09890f3" } })
    );
    assert_eq!(render("height==1.5", "Person"), json!({ "height": 1.5 }));
    assert_eq!(
        render("score>NaN", "Post"),
        json!({ "score": { "$gt": { "$numberDouble": "NaN" } } })
    );
}

#[test]
fn golden_reference_path() {
    assert_eq!(
        render("author==7", "Post"),
        json!({ "author.$id": 7 })
    );
}
