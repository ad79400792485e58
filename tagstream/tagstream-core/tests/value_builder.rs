mod common;

use common::{Recorded, Recorder};
use pretty_assertions::assert_eq;
use tagstream_core::{
    ErrorCode, ErrorKind, SemanticTag, SerContext, TypedArrayView, Value, ValueBuilder,
    VisitorExt,
};

const NONE: SemanticTag = SemanticTag::None;

fn ctx() -> SerContext {
    SerContext::new(1, 1)
}

// ── building ─────────────────────────────────────────────────────────────────

#[test]
fn builds_nested_document() {
    let c = ctx();
    let mut builder = ValueBuilder::new();
    builder.begin_object(None, NONE, &c).unwrap();
    builder.key("name", &c).unwrap();
    builder.string_value("sensor", NONE, &c).unwrap();
    builder.key("readings", &c).unwrap();
    builder.begin_array(Some(3), NONE, &c).unwrap();
    builder.int64_value(-1, NONE, &c).unwrap();
    builder.uint64_value(2, NONE, &c).unwrap();
    builder.double_value(0.5, NONE, &c).unwrap();
    builder.end_array(&c).unwrap();
    builder.key("raw", &c).unwrap();
    builder.byte_string_value(&[0xde, 0xad], SemanticTag::Base16, &c).unwrap();
    builder.key("missing", &c).unwrap();
    builder.null_value(NONE, &c).unwrap();
    assert_eq!(builder.depth(), 1);
    builder.end_object(&c).unwrap();
    assert!(builder.is_complete());

    let expected = Value::object([
        ("name", Value::string("sensor")),
        (
            "readings",
            Value::Array(vec![Value::I64(-1), Value::U64(2), Value::F64(0.5)]),
        ),
        ("raw", Value::bytes([0xde_u8, 0xad])),
        ("missing", Value::Null),
    ]);
    assert_eq!(builder.into_value(), Some(expected));
}

#[test]
fn multi_dim_materializes_as_shape_and_data() {
    let c = ctx();
    let mut builder = ValueBuilder::new();
    builder
        .begin_multi_dim(&[2, 3], SemanticTag::MultiDimRowMajor, &c)
        .unwrap();
    builder
        .typed_array(TypedArrayView::U8(&[1, 2, 3, 4, 5, 6]), NONE, &c)
        .unwrap();
    builder.end_multi_dim(&c).unwrap();

    let expected = Value::Array(vec![
        Value::Array(vec![Value::U64(2), Value::U64(3)]),
        Value::Array((1..=6).map(Value::U64).collect()),
    ]);
    assert_eq!(builder.into_value(), Some(expected));
}

#[test]
fn half_and_signed_typed_array_decompose_into_scalars() {
    let c = ctx();
    let mut builder = ValueBuilder::new();
    builder.begin_array(None, NONE, &c).unwrap();
    builder.half_value(0xc000, NONE, &c).unwrap();
    builder
        .typed_array(TypedArrayView::I16(&[-3, 4]), NONE, &c)
        .unwrap();
    builder.end_array(&c).unwrap();

    let expected = Value::Array(vec![
        Value::F64(-2.0),
        Value::Array(vec![Value::I64(-3), Value::I64(4)]),
    ]);
    assert_eq!(builder.into_value(), Some(expected));
}

#[test]
fn incomplete_traversal_yields_nothing() {
    let c = ctx();
    let mut builder = ValueBuilder::new();
    builder.begin_array(None, NONE, &c).unwrap();
    builder.bool_value(true, NONE, &c).unwrap();
    assert!(!builder.is_complete());
    assert_eq!(builder.take_value(), None);
    assert_eq!(builder.into_value(), None);
}

#[test]
fn reset_allows_reuse() {
    let c = SerContext::default();
    let mut builder = ValueBuilder::new();
    builder.begin_object(None, NONE, &c).unwrap();
    builder.reset();
    assert_eq!(builder.depth(), 0);

    builder.uint64_value(9, NONE, &c).unwrap();
    assert_eq!(builder.take_value(), Some(Value::U64(9)));
    builder.bool_value(false, NONE, &c).unwrap();
    assert_eq!(builder.take_value(), Some(Value::Bool(false)));
}

// ── rejected sequences ───────────────────────────────────────────────────────

#[test]
fn value_without_key_is_rejected_with_position() {
    let mut builder = ValueBuilder::new();
    builder.begin_object(None, NONE, &ctx()).unwrap();
    let err = builder
        .int64_value(1, NONE, &SerContext::new(3, 9))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingKey);
    assert_eq!(err.kind(), ErrorKind::ConsumerRejected);
    assert_eq!((err.line(), err.column()), (3, 9));
}

#[test]
fn misordered_end_is_rejected() {
    let c = ctx();
    let mut builder = ValueBuilder::new();
    builder.begin_array(None, NONE, &c).unwrap();
    assert_eq!(
        builder.end_object(&c).unwrap_err().code(),
        ErrorCode::UnbalancedEnd
    );

    let mut builder = ValueBuilder::new();
    assert_eq!(
        builder.end_array(&c).unwrap_err().code(),
        ErrorCode::UnbalancedEnd
    );
}

#[test]
fn second_root_and_stray_key_are_rejected() {
    let c = ctx();
    let mut builder = ValueBuilder::new();
    builder.null_value(NONE, &c).unwrap();
    assert_eq!(
        builder.null_value(NONE, &c).unwrap_err().code(),
        ErrorCode::UnexpectedEvent
    );

    let mut builder = ValueBuilder::new();
    builder.begin_array(None, NONE, &c).unwrap();
    assert_eq!(
        builder.key("k", &c).unwrap_err().code(),
        ErrorCode::UnexpectedEvent
    );

    let mut builder = ValueBuilder::new();
    builder.begin_object(None, NONE, &c).unwrap();
    builder.key("k", &c).unwrap();
    assert_eq!(
        builder.end_object(&c).unwrap_err().code(),
        ErrorCode::UnexpectedEvent
    );
}

// ── replay ───────────────────────────────────────────────────────────────────

#[test]
fn emit_replays_into_builder() {
    let document = Value::object([
        ("id", Value::U64(7)),
        ("tags", Value::Array(vec![Value::string("a"), Value::Null])),
        ("nested", Value::object([("x", Value::F64(1.5))])),
    ]);
    let mut builder = ValueBuilder::new();
    assert_eq!(document.emit(&mut builder), Ok(true));
    assert_eq!(builder.into_value(), Some(document));
}

#[test]
fn emit_stops_where_visitor_stops() {
    let document = Value::Array(vec![Value::I64(1), Value::I64(2), Value::I64(3)]);
    let mut recorder = Recorder::stopping_at(3);
    assert_eq!(document.emit(&mut recorder), Ok(false));
    assert_eq!(
        recorder.events,
        vec![
            Recorded::BeginArray(Some(3), NONE),
            Recorded::Int64(1, NONE),
            Recorded::Int64(2, NONE),
        ]
    );
}

// ── accessors ────────────────────────────────────────────────────────────────

#[test]
fn typed_accessors() {
    let document = Value::object([
        ("flag", Value::Bool(true)),
        ("count", Value::U64(3)),
        ("name", Value::string("n")),
        ("none", Value::Null),
    ]);
    assert_eq!(document.get("flag").unwrap().try_bool(), Ok(Some(true)));
    assert_eq!(document.get("count").unwrap().try_u64(), Ok(Some(3)));
    assert_eq!(document.get("name").unwrap().try_str(), Ok(Some("n")));
    assert_eq!(document.get("none").unwrap().try_i64(), Ok(None));
    assert!(document.get("absent").is_none());
    assert_eq!(document.as_object().map(<[_]>::len), Some(4));

    let err = document.get("count").unwrap().try_i64().unwrap_err();
    assert_eq!(err.expected(), "I64");
    assert_eq!(err.actual(), "U64");
    assert_eq!(err.to_string(), "type mismatch: expected I64, found U64");
}

#[test]
fn tag_names() {
    assert_eq!(SemanticTag::None.as_str(), "n/a");
    assert_eq!(SemanticTag::EpochMilli.to_string(), "epoch-milli");
    assert!(SemanticTag::EpochNano.is_epoch_time());
    assert!(SemanticTag::MultiDimColumnMajor.is_multi_dim());
    assert!(SemanticTag::default().is_none());
}
