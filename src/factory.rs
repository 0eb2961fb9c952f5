//! Factory facet (`spec.md` §6): `create` methods per kind.

use std::sync::Arc;
use typir_common::EngineError;
use typir_graph::kind::class::{ClassData, ClassField, ClassIdentity, FieldVariance};
use typir_graph::kind::fixed_parameters::{FixedParametersData, FixedParametersTemplate, ParameterVariance};
use typir_graph::kind::function::{FunctionData, FunctionParam};
use typir_graph::kind::primitive::PrimitiveData;
use typir_graph::{TypeGraph, TypeId, TypeKind};
use typir_infer::{CallInferenceRule, DeclarationInferenceRule, InferenceRegistry, ValidationRule};

// ----------------------------------------------------------------------
// Primitives.create({ name, inferenceRules? })
// ----------------------------------------------------------------------

pub struct Primitives<'a, N> {
    graph: &'a mut TypeGraph,
    inference: &'a mut InferenceRegistry<N>,
}

impl<'a, N> Primitives<'a, N> {
    pub(crate) fn new(graph: &'a mut TypeGraph, inference: &'a mut InferenceRegistry<N>) -> Self {
        Self { graph, inference }
    }

    /// Creates (or returns the existing) primitive named `name`. Each
    /// predicate in `inference_rules` is wired as a rule bound to this
    /// primitive's type, so a host node the predicate accepts is inferred
    /// as this primitive (`spec.md` §4.B, §6).
    pub fn create(&mut self, name: impl AsRef<str>, inference_rules: Vec<Box<dyn Fn(&N) -> bool>>) -> TypeId
    where
        N: 'static,
    {
        let name = name.as_ref();
        let id = self
            .graph
            .create_type(PrimitiveData::identifier(name), TypeKind::Primitive(PrimitiveData { name: name.into() }));
        for (i, predicate) in inference_rules.into_iter().enumerate() {
            let label: &'static str = Box::leak(format!("primitive:{name}#{i}").into_boxed_str());
            self.inference.add_inference_rule(
                Box::new(DeclarationInferenceRule::new(label, id, move |node: &N| predicate(node))),
                Some(id),
            );
        }
        id
    }
}

// ----------------------------------------------------------------------
// Classes.create({ name, fields, superClasses? })
// ----------------------------------------------------------------------

pub struct ClassFieldSpec {
    pub name: Arc<str>,
    pub type_id: TypeId,
}

pub struct ClassSpec {
    pub qualified_name: Arc<str>,
    pub fields: Vec<ClassFieldSpec>,
    pub super_classes: Vec<TypeId>,
    pub identity: ClassIdentity,
    pub field_variance: FieldVariance,
}

pub struct Classes<'a> {
    graph: &'a mut TypeGraph,
}

impl<'a> Classes<'a> {
    pub(crate) fn new(graph: &'a mut TypeGraph) -> Self {
        Self { graph }
    }

    /// Eager class creation: every field and super-class type must already
    /// exist. Use [`Self::create_recursive`] for a class whose fields refer
    /// back to itself (`spec.md` §4.C, §8 S5).
    pub fn create(&mut self, spec: ClassSpec) -> TypeId {
        let fields: Vec<ClassField> = spec
            .fields
            .into_iter()
            .map(|f| ClassField {
                name: f.name,
                type_id: f.type_id,
            })
            .collect();
        let identifier = class_identifier(self.graph, &spec.qualified_name, spec.identity, &fields);
        let id = self.graph.create_type(
            identifier,
            TypeKind::Class(ClassData {
                qualified_name: spec.qualified_name,
                fields,
                super_classes: spec.super_classes.clone(),
                identity: spec.identity,
                field_variance: spec.field_variance,
            }),
        );
        materialize_super_class_edges(self.graph, id, &spec.super_classes);
        id
    }

    /// Recursive class creation (`spec.md` §4.C, §8 S5): `build_fields`
    /// receives the reserved (not-yet-complete) `TypeId` for the class being
    /// defined, so a field may reference the class itself — e.g. `class Node
    /// { next: Node }`. Finalizes synchronously since there are no
    /// precondition identifiers to wait on; the self-reference is closed
    /// over the returned `TypeId` directly rather than by identifier lookup.
    pub fn create_recursive(
        &mut self,
        qualified_name: Arc<str>,
        super_classes: Vec<TypeId>,
        identity: ClassIdentity,
        field_variance: FieldVariance,
        build_fields: impl FnOnce(TypeId) -> Vec<ClassFieldSpec> + 'static,
    ) -> TypeId {
        let supers_for_finalize = super_classes.clone();
        let id = self.graph.begin_type(Vec::new(), move |graph, self_id| {
            let fields: Vec<ClassField> = build_fields(self_id)
                .into_iter()
                .map(|f| ClassField {
                    name: f.name,
                    type_id: f.type_id,
                })
                .collect();
            let identifier = class_identifier(graph, &qualified_name, identity, &fields);
            Ok((
                identifier,
                TypeKind::Class(ClassData {
                    qualified_name,
                    fields,
                    super_classes: supers_for_finalize,
                    identity,
                    field_variance,
                }),
            ))
        });
        materialize_super_class_edges(self.graph, id, &super_classes);
        id
    }
}

fn class_identifier(graph: &TypeGraph, qualified_name: &str, identity: ClassIdentity, fields: &[ClassField]) -> Arc<str> {
    match identity {
        ClassIdentity::Nominal => typir_graph::kind::class::derive_identifier(qualified_name, identity, &[]),
        ClassIdentity::Structural => {
            let mut sorted: Vec<(Arc<str>, Arc<str>)> = fields
                .iter()
                .map(|f| {
                    let ty_ident = graph
                        .get_type(f.type_id)
                        .map(|n| n.identifier.clone())
                        .unwrap_or_else(|| Arc::from(format!("{}", f.type_id)));
                    (f.name.clone(), ty_ident)
                })
                .collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            typir_graph::kind::class::derive_identifier(qualified_name, identity, &sorted)
        }
    }
}

fn materialize_super_class_edges(graph: &mut TypeGraph, sub: TypeId, super_classes: &[TypeId]) {
    for &sup in super_classes {
        if let Err(problem) = graph.mark_as_sub_type(sub, sup, true) {
            tracing::warn!(%problem, "declared super-class would close a subtype cycle, edge skipped");
        }
    }
}

// ----------------------------------------------------------------------
// FixedParameters(baseName, [paramNames], { variance }).create({ parameterTypes })
// ----------------------------------------------------------------------

pub struct FixedParametersFactory<'a> {
    graph: &'a mut TypeGraph,
}

impl<'a> FixedParametersFactory<'a> {
    pub(crate) fn new(graph: &'a mut TypeGraph) -> Self {
        Self { graph }
    }

    /// `FixedParameters(baseName, [paramNames], { variance })`: declares or
    /// redeclares the template. Redeclaring changes how every existing
    /// instantiation of `base_name` subtypes (`spec.md` §4.B, §8 S4).
    pub fn declare_template(&mut self, base_name: impl Into<Arc<str>>, param_names: Vec<Arc<str>>, variance: ParameterVariance) {
        self.graph.declare_fixed_parameters_template(FixedParametersTemplate {
            base_name: base_name.into(),
            param_names,
            variance,
        });
    }

    /// `.create({ parameterTypes })`: one instantiation, e.g. `List<Int>`.
    /// `base_name`'s arity must already be declared via
    /// [`Self::declare_template`]; a mismatched arity is a programmer
    /// mistake (`spec.md` §7) and aborts.
    pub fn create(&mut self, base_name: impl Into<Arc<str>>, parameter_types: Vec<TypeId>) -> TypeId {
        let base_name = base_name.into();
        if let Some(template) = self.graph.fixed_parameters_template(&base_name) {
            if template.arity() != parameter_types.len() {
                EngineError::InvalidArity {
                    kind: "fixed-parameters",
                    identifier: base_name.clone(),
                    expected: template.arity(),
                    actual: parameter_types.len(),
                }
                .abort();
            }
        }
        let identifiers: Vec<Arc<str>> = parameter_types
            .iter()
            .map(|&t| {
                self.graph
                    .get_type(t)
                    .map(|n| n.identifier.clone())
                    .unwrap_or_else(|| Arc::from(format!("{t}")))
            })
            .collect();
        let identifier = typir_graph::kind::fixed_parameters::derive_identifier(&base_name, &identifiers);
        self.graph.create_type(
            identifier,
            TypeKind::FixedParameters(FixedParametersData {
                base_name,
                parameter_types,
            }),
        )
    }
}

// ----------------------------------------------------------------------
// Functions.create({ name, output, inputs, inferenceRuleForCalls?,
//                     inferenceRuleForDeclaration?, validationForCall? })
// ----------------------------------------------------------------------

pub struct FunctionSpec<N> {
    pub name: Arc<str>,
    pub output: TypeId,
    pub inputs: Vec<(Arc<str>, TypeId)>,
    /// Recognizes a host node as a call to this function, returning its
    /// operand subnodes (`spec.md` §4.H two-step protocol).
    pub inference_rule_for_calls: Option<Box<dyn Fn(&N) -> Option<Vec<N>>>>,
    /// Recognizes a host node as being this function's own declaration.
    pub inference_rule_for_declaration: Option<Box<dyn Fn(&N) -> bool>>,
    pub validation_for_call: Option<Box<dyn ValidationRule<N>>>,
}

impl<N> FunctionSpec<N> {
    pub fn new(name: impl Into<Arc<str>>, output: TypeId, inputs: Vec<(Arc<str>, TypeId)>) -> Self {
        Self {
            name: name.into(),
            output,
            inputs,
            inference_rule_for_calls: None,
            inference_rule_for_declaration: None,
            validation_for_call: None,
        }
    }
}

pub struct Functions<'a, N> {
    graph: &'a mut TypeGraph,
    inference: &'a mut InferenceRegistry<N>,
}

impl<'a, N: 'static> Functions<'a, N> {
    pub(crate) fn new(graph: &'a mut TypeGraph, inference: &'a mut InferenceRegistry<N>) -> Self {
        Self { graph, inference }
    }

    pub fn create(&mut self, spec: FunctionSpec<N>) -> TypeId {
        let inputs: Vec<FunctionParam> = spec
            .inputs
            .iter()
            .map(|(name, type_id)| FunctionParam {
                name: name.clone(),
                type_id: *type_id,
            })
            .collect();
        let input_idents: Vec<Arc<str>> = inputs
            .iter()
            .map(|p| self.graph.get_type(p.type_id).map(|n| n.identifier.clone()).unwrap_or_else(|| Arc::from(format!("{}", p.type_id))))
            .collect();
        let output_ident = self
            .graph
            .get_type(spec.output)
            .map(|n| n.identifier.clone())
            .unwrap_or_else(|| Arc::from(format!("{}", spec.output)));
        let identifier = typir_graph::kind::function::derive_identifier(&spec.name, &input_idents, &output_ident);
        let id = self.graph.create_type(
            identifier,
            TypeKind::Function(FunctionData {
                name: spec.name.clone(),
                output: spec.output,
                inputs,
            }),
        );
        self.graph.register_function(spec.name.clone(), id);

        if let Some(matcher) = spec.inference_rule_for_calls {
            self.inference
                .add_inference_rule(Box::new(CallInferenceRule::new(spec.name.clone(), move |n: &N| matcher(n))), None);
        }
        if let Some(matcher) = spec.inference_rule_for_declaration {
            let label: &'static str = Box::leak(format!("function-decl:{}", spec.name).into_boxed_str());
            self.inference.add_inference_rule(
                Box::new(DeclarationInferenceRule::new(label, id, move |n: &N| matcher(n))),
                Some(id),
            );
        }
        id
    }
}

// ----------------------------------------------------------------------
// Operators.createUnary/Binary/Ternary/Generic(...) — functions whose
// "declaration" rule is absent (spec.md §6).
// ----------------------------------------------------------------------

pub struct Operators<'a, N> {
    graph: &'a mut TypeGraph,
    inference: &'a mut InferenceRegistry<N>,
}

impl<'a, N: 'static> Operators<'a, N> {
    pub(crate) fn new(graph: &'a mut TypeGraph, inference: &'a mut InferenceRegistry<N>) -> Self {
        Self { graph, inference }
    }

    fn create(&mut self, name: Arc<str>, output: TypeId, inputs: Vec<(Arc<str>, TypeId)>, matcher: Box<dyn Fn(&N) -> Option<Vec<N>>>) -> TypeId {
        let mut functions = Functions::new(self.graph, self.inference);
        let mut spec = FunctionSpec::new(name, output, inputs);
        spec.inference_rule_for_calls = Some(matcher);
        functions.create(spec)
    }

    pub fn create_unary(&mut self, name: impl Into<Arc<str>>, operand: TypeId, output: TypeId, matcher: impl Fn(&N) -> Option<Vec<N>> + 'static) -> TypeId {
        self.create(name.into(), output, vec![(Arc::from("operand"), operand)], Box::new(matcher))
    }

    pub fn create_binary(&mut self, name: impl Into<Arc<str>>, lhs: TypeId, rhs: TypeId, output: TypeId, matcher: impl Fn(&N) -> Option<Vec<N>> + 'static) -> TypeId {
        self.create(name.into(), output, vec![(Arc::from("lhs"), lhs), (Arc::from("rhs"), rhs)], Box::new(matcher))
    }

    pub fn create_ternary(
        &mut self,
        name: impl Into<Arc<str>>,
        first: TypeId,
        second: TypeId,
        third: TypeId,
        output: TypeId,
        matcher: impl Fn(&N) -> Option<Vec<N>> + 'static,
    ) -> TypeId {
        self.create(
            name.into(),
            output,
            vec![(Arc::from("first"), first), (Arc::from("second"), second), (Arc::from("third"), third)],
            Box::new(matcher),
        )
    }

    /// `createGeneric`: arbitrary, host-named arity.
    pub fn create_generic(&mut self, name: impl Into<Arc<str>>, inputs: Vec<(Arc<str>, TypeId)>, output: TypeId, matcher: impl Fn(&N) -> Option<Vec<N>> + 'static) -> TypeId {
        self.create(name.into(), output, inputs, Box::new(matcher))
    }
}
