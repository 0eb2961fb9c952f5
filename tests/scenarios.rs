//! End-to-end scenarios exercising `Engine` the way an embedding host would:
//! build a few types, wire relations/rules, query. One test per scenario.

use typir::kind::class::{ClassIdentity, FieldVariance};
use typir::kind::fixed_parameters::ParameterVariance;
use typir::{
    ClassFieldSpec, ConversionMode, Engine, FunctionSpec, InferenceOutcome, InferenceRule, PathStep, ProblemKind, RuleOutcome, TypeId,
};

#[derive(Clone)]
enum Node {
    Typed(TypeId),
    Call(&'static str, Vec<Node>),
}

struct LeafRule;
impl InferenceRule<Node> for LeafRule {
    fn infer(&self, node: &Node) -> RuleOutcome<Node> {
        match node {
            Node::Typed(t) => RuleOutcome::Type(*t),
            Node::Call(..) => RuleOutcome::NotApplicable,
        }
    }
}

fn primitive(engine: &mut Engine<Node>, name: &str) -> TypeId {
    engine.primitives().create(name, Vec::new())
}

/// S1 — conversion chain: `b <:conv i <:sub d <:conv s`.
#[test]
fn s1_conversion_chain() {
    let mut engine: Engine<Node> = Engine::new();
    let b = primitive(&mut engine, "boolean");
    let i = primitive(&mut engine, "int");
    let d = primitive(&mut engine, "double");
    let s = primitive(&mut engine, "string");

    engine.conversion().mark_as_convertible(b, i, ConversionMode::ImplicitExplicit);
    engine.subtype().mark_as_sub_type(i, d).unwrap();
    engine.conversion().mark_as_convertible(d, s, ConversionMode::ImplicitExplicit);

    let path_len = |from: TypeId, to: TypeId| engine.assignability().path_or_problem(from, to).unwrap().len();
    assert_eq!(path_len(i, d), 1);
    assert_eq!(path_len(b, d), 2);
    assert_eq!(path_len(i, s), 2);
    assert_eq!(path_len(b, s), 3);

    let b_to_s = engine.assignability().path_or_problem(b, s).unwrap();
    assert!(matches!(b_to_s[0], PathStep::Edge(e) if e.label == typir::EdgeLabel::Conversion(ConversionMode::ImplicitExplicit)));
    assert!(matches!(b_to_s[1], PathStep::Edge(e) if e.label == typir::EdgeLabel::SubType));
    assert!(matches!(b_to_s[2], PathStep::Edge(e) if e.label == typir::EdgeLabel::Conversion(ConversionMode::ImplicitExplicit)));

    let err = engine.assignability().path_or_problem(s, b).unwrap_err();
    assert_eq!(err.kind, ProblemKind::Assignability);
}

fn build_s1_chain(engine: &mut Engine<Node>) -> (TypeId, TypeId, TypeId, TypeId) {
    let b = primitive(engine, "boolean");
    let i = primitive(engine, "int");
    let d = primitive(engine, "double");
    let s = primitive(engine, "string");
    engine.conversion().mark_as_convertible(b, i, ConversionMode::ImplicitExplicit);
    engine.subtype().mark_as_sub_type(i, d).unwrap();
    engine.conversion().mark_as_convertible(d, s, ConversionMode::ImplicitExplicit);
    (b, i, d, s)
}

/// S2 — binary `+` best match across the S1 chain.
#[test]
fn s2_operator_overload_best_match() {
    let mut engine: Engine<Node> = Engine::new();
    let (b, i, d, s) = build_s1_chain(&mut engine);

    let matcher = |n: &Node| match n {
        Node::Call("+", args) => Some(args.clone()),
        _ => None,
    };
    engine.operators().create_binary("+", i, i, i, matcher);
    engine.operators().create_binary("+", d, d, d, |_: &Node| None::<Vec<Node>>);
    engine.operators().create_binary("+", s, s, s, |_: &Node| None::<Vec<Node>>);
    engine.operators().create_binary("+", b, b, b, |_: &Node| None::<Vec<Node>>);

    engine.inference().add_inference_rule(Box::new(LeafRule), None);
    let resolve = |l: TypeId, r: TypeId| {
        let call = Node::Call("+", vec![Node::Typed(l), Node::Typed(r)]);
        match engine.inference().infer_type(&call) {
            InferenceOutcome::Resolved(t) => t,
            other => panic!("expected a resolved type, got {other:?}"),
        }
    };

    assert_eq!(resolve(i, s), s);
    assert_eq!(resolve(d, i), d);
    assert_eq!(resolve(i, b), i);
}

/// S3 — function call inference with overloaded `f`.
#[test]
fn s3_function_call_inference() {
    let mut engine: Engine<Node> = Engine::new();
    let int = primitive(&mut engine, "int");
    let double = primitive(&mut engine, "double");
    let string = primitive(&mut engine, "string");
    let boolean = primitive(&mut engine, "bool");
    engine.conversion().mark_as_convertible(boolean, int, ConversionMode::ImplicitExplicit);

    engine.inference().add_inference_rule(Box::new(LeafRule), None);

    let matcher = |n: &Node| match n {
        Node::Call("f", args) => Some(args.clone()),
        _ => None,
    };
    let mut f_int = FunctionSpec::new("f", string, vec![(std::sync::Arc::from("x"), int)]);
    f_int.inference_rule_for_calls = Some(Box::new(matcher));
    engine.functions().create(f_int);
    let f_double = FunctionSpec::new("f", boolean, vec![(std::sync::Arc::from("x"), double)]);
    engine.functions().create(f_double);

    let call = |arg: TypeId| {
        let node = Node::Call("f", vec![Node::Typed(arg)]);
        engine.inference().infer_type(&node)
    };

    assert!(matches!(call(int), InferenceOutcome::Resolved(t) if t == string));
    assert!(matches!(call(double), InferenceOutcome::Resolved(t) if t == boolean));
    assert!(matches!(call(boolean), InferenceOutcome::Resolved(t) if t == string));

    let s = primitive(&mut engine, "unrelated");
    match call(s) {
        InferenceOutcome::Failed(problem) => assert_eq!(problem.kind, ProblemKind::Assignability),
        other => panic!("expected a failure, got {other:?}"),
    }
}

/// S4 — `List<T>` subtyping follows its declared variance.
#[test]
fn s4_fixed_parameters_variance() {
    let mut engine: Engine<Node> = Engine::new();
    let i = primitive(&mut engine, "int");
    let d = primitive(&mut engine, "double");
    engine.subtype().mark_as_sub_type(i, d).unwrap();

    let mut fp = engine.fixed_parameters();
    fp.declare_template("List", vec![std::sync::Arc::from("T")], ParameterVariance::EqualType);
    let list_i = fp.create("List", vec![i]);
    let list_d = fp.create("List", vec![d]);

    assert!(engine.subtype().result(list_i, list_d).is_err());

    engine
        .fixed_parameters()
        .declare_template("List", vec![std::sync::Arc::from("T")], ParameterVariance::SubType);
    assert!(engine.subtype().is_sub_type(list_i, list_d));
}

/// S5 — a class whose own field refers back to itself.
#[test]
fn s5_class_recursion() {
    let mut engine: Engine<Node> = Engine::new();
    let node_id = engine.classes().create_recursive(
        std::sync::Arc::from("Node"),
        Vec::new(),
        ClassIdentity::Nominal,
        FieldVariance::Invariant,
        |self_id| {
            vec![ClassFieldSpec {
                name: std::sync::Arc::from("next"),
                type_id: self_id,
            }]
        },
    );

    assert!(engine.equality().are_equal(node_id, node_id));
    let graph = engine.graph();
    let typir_graph::TypeNode {
        kind: typir_graph::TypeKind::Class(class),
        ..
    } = graph.get_type(node_id).expect("Node must be resolvable")
    else {
        panic!("Node must be a class");
    };
    assert_eq!(class.fields[0].type_id, node_id);
}

/// S6 — a second `markAsSubType` that would close a cycle is refused.
#[test]
fn s6_cycle_refusal() {
    let mut engine: Engine<Node> = Engine::new();
    let a = primitive(&mut engine, "A");
    let b = primitive(&mut engine, "B");
    engine.subtype().mark_as_sub_type(a, b).unwrap();
    let err = engine.subtype().mark_as_sub_type(b, a).unwrap_err();
    assert_eq!(err.kind, ProblemKind::Initialization);
    assert!(engine.subtype().is_sub_type(a, b));
    assert!(!engine.subtype().is_sub_type(b, a));
}
